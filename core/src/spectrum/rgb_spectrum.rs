//! RGB Spectrum.

use super::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign};

/// Number of spectral samples to use for `RGBSpectrum`.
pub const RGB_SAMPLES: usize = 3;

/// RGBSpectrum represents an spectral power distribution (SPD) with
/// a weighted sum of red, green and blue components.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RGBSpectrum {
    /// The sampled spectral values.
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Create a new `RGBSpectrum` with a constant value across all
    /// wavelengths.
    ///
    /// * `v` - Constant value.
    pub fn new(v: Float) -> Self {
        let ret = Self {
            c: [v; RGB_SAMPLES],
        };
        debug_assert!(!ret.has_nans());
        ret
    }

    /// Create a new `RGBSpectrum` from red, green and blue values.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns true if any of the samples are NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if all samples are zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns true if all samples are finite.
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }

    /// Returns the average of the samples.
    pub fn average(&self) -> Float {
        self.c.iter().sum::<Float>() / RGB_SAMPLES as Float
    }

    /// Returns the y-coefficient of XYZ colour.
    pub fn y(&self) -> Float {
        0.212671 * self.c[0] + 0.715160 * self.c[1] + 0.072169 * self.c[2]
    }

    /// Returns the samples as an RGB triple.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }
}

impl Default for RGBSpectrum {
    /// Return a black `RGBSpectrum`.
    fn default() -> Self {
        Self {
            c: [0.0; RGB_SAMPLES],
        }
    }
}

impl From<[Float; 3]> for RGBSpectrum {
    /// Create a new `RGBSpectrum` from RGB values.
    ///
    /// * `rgb` - RGB values.
    fn from(rgb: [Float; 3]) -> Self {
        Self { c: rgb }
    }
}

impl From<[f64; 3]> for RGBSpectrum {
    /// Create a new `RGBSpectrum` from double precision RGB values, as
    /// produced by table lookups and fitted models.
    ///
    /// * `rgb` - RGB values.
    fn from(rgb: [f64; 3]) -> Self {
        Self {
            c: [rgb[0] as Float, rgb[1] as Float, rgb[2] as Float],
        }
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    /// Adds the sample values of another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn add(self, other: Self) -> Self::Output {
        Self {
            c: [
                self.c[0] + other.c[0],
                self.c[1] + other.c[1],
                self.c[2] + other.c[2],
            ],
        }
    }
}

impl AddAssign for RGBSpectrum {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The other spectrum.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    /// Multiplies the sample values of another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn mul(self, other: Self) -> Self::Output {
        Self {
            c: [
                self.c[0] * other.c[0],
                self.c[1] * other.c[1],
                self.c[2] * other.c[2],
            ],
        }
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the sample values.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self::Output {
        Self {
            c: [self.c[0] * f, self.c[1] * f, self.c[2] * f],
        }
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scales the sample values.
    ///
    /// * `s` - The spectrum.
    fn mul(self, s: RGBSpectrum) -> Self::Output {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    /// Scales the sample values and assigns the result.
    ///
    /// * `f` - The scaling factor.
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the sample values by 1/f.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    /// Returns the sample at the given index.
    ///
    /// * `i` - Channel index.
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    /// Returns the mutable sample at the given index.
    ///
    /// * `i` - Channel index.
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.c[i]
    }
}

impl fmt::Display for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_black() {
        assert!(RGBSpectrum::default().is_black());
        assert!(!RGBSpectrum::new(0.5).is_black());
    }

    #[test]
    fn from_f64_narrows() {
        let s = RGBSpectrum::from([0.25_f64, 0.5, 1.0]);
        assert_eq!(s, RGBSpectrum::rgb(0.25, 0.5, 1.0));
        assert!(approx_eq!(f32, s.average(), 1.75 / 3.0, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn scale_then_divide(r in 0.0..10.0f32, g in 0.0..10.0f32, b in 0.0..10.0f32, f in 0.5..4.0f32) {
            let s = RGBSpectrum::rgb(r, g, b);
            let t = (s * f) / f;
            for i in 0..RGB_SAMPLES {
                prop_assert!(approx_eq!(f32, t[i], s[i], epsilon = 1e-4));
            }
        }
    }
}
