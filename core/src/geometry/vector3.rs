//! 3-D Vectors

use super::common::*;
use super::Float;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

/// A 3-D vector containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D vector containing `Float` values.
pub type Vector3f = Vector3<Float>;

/// 3-D vector containing `f64` values. Table lookups and model fits run at
/// this precision.
pub type Vector3d = Vector3<f64>;

impl<T: Num> Vector3<T> {
    /// Creates a new 3-D vector.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero vector.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool
    where
        T: num_traits::Float,
    {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> T
    where
        T: Mul<Output = T> + Add<Output = T> + Copy,
    {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the vector's length.
    pub fn length(&self) -> T
    where
        T: num_traits::Float,
    {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector.
    pub fn normalize(&self) -> Self
    where
        T: num_traits::Float,
    {
        *self / self.length()
    }
}

impl<T: Num + Neg<Output = T> + PartialOrd + Copy> Dot<Vector3<T>> for Vector3<T> {
    type Output = T;

    /// Returns the dot product with another vector.
    ///
    /// * `other` -  The other vector.
    fn dot(&self, other: &Vector3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl<T: Num> Add for Vector3<T> {
    type Output = Self;

    /// Adds the given vector and returns the result.
    ///
    /// * `other` -  The vector to add.
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Num> Sub for Vector3<T> {
    type Output = Self;

    /// Subtracts the given vector and returns the result.
    ///
    /// * `other` -  The vector to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Num + Copy> Mul<T> for Vector3<T> {
    type Output = Vector3<T>;

    /// Scale the vector.
    ///
    /// * `f` -  The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y, f * self.z)
    }
}

macro_rules! premul {
    ($t: ty) => {
        impl Mul<Vector3<$t>> for $t {
            type Output = Vector3<$t>;
            /// Scale the vector.
            ///
            /// * `v` -  The vector.
            fn mul(self, v: Vector3<$t>) -> Vector3<$t> {
                Vector3::<$t>::new(self * v.x, self * v.y, self * v.z)
            }
        }
    };
}

premul!(f32);
premul!(f64);

impl<T: Num + Copy> Div<T> for Vector3<T> {
    type Output = Self;

    /// Scale the vector by 1/f.
    ///
    /// * `f` -  The scaling factor.
    fn div(self, f: T) -> Self::Output {
        debug_assert!(!f.is_zero());

        let inv = T::one() / f;
        Self::Output::new(inv * self.x, inv * self.y, inv * self.z)
    }
}

impl<T: Num + Neg<Output = T>> Neg for Vector3<T> {
    type Output = Vector3<T>;

    /// Flip the vector's direction (scale by -1).
    fn neg(self) -> Self::Output {
        Self::Output::new(-self.x, -self.y, -self.z)
    }
}

impl<T> Index<usize> for Vector3<T> {
    type Output = T;

    /// Index the vector by coordinate axis.
    ///
    /// * `axis` -  0, 1 or 2 for x, y and z.
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Invalid axis {axis} for Vector3"),
        }
    }
}

impl From<Vector3<f32>> for Vector3<f64> {
    /// Widen a single precision vector.
    ///
    /// * `v` - The vector.
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x as f64, v.y as f64, v.z as f64)
    }
}

impl From<Vector3<f64>> for Vector3<f32> {
    /// Narrow a double precision vector.
    ///
    /// * `v` - The vector.
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl<T: fmt::Display> fmt::Display for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_vector() {
        assert!(Vector3::new(0.0, 0.0, 0.0) == Vector3f::zero());
    }

    #[test]
    fn has_nans() {
        assert!(!Vector3::new(0.0, 0.0, 0.0).has_nans());
        assert!(Vector3::new(f32::NAN, f32::NAN, f32::NAN).has_nans());
    }

    #[test]
    fn widen_then_narrow() {
        let v = Vector3f::new(0.25, -0.5, 0.75);
        assert_eq!(Vector3f::from(Vector3d::from(v)), v);
    }

    prop_vector3!(
        vector3_f32,
        f32,
        -100.0..100.0f32,
        -100.0..100.0f32,
        -100.0..100.0f32
    );

    proptest! {
        #[test]
        fn length_squared_f32(v in vector3_f32()) {
            prop_assert_eq!(v.length_squared(), v.x * v.x + v.y * v.y + v.z * v.z);
        }

        #[test]
        fn normalize_f32(v in vector3_f32()) {
            prop_assume!(v.length() > 0.0);
            // Since we do 1.0 / l in implementation we have to do the
            // same here.
            let f = 1.0 / (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
            prop_assert_eq!(v.normalize(), Vector3::new(v.x * f, v.y * f, v.z * f));
        }

        #[test]
        fn dot_f32(v1 in vector3_f32(), v2 in vector3_f32()) {
            prop_assert_eq!(v1.dot(&v2), v1.x * v2.x + v1.y * v2.y + v1.z * v2.z);
        }

        #[test]
        fn abs_dot_f32(v1 in vector3_f32(), v2 in vector3_f32()) {
            prop_assert_eq!(v1.abs_dot(&v2), (v1.x * v2.x + v1.y * v2.y + v1.z * v2.z).abs());
        }

        #[test]
        fn add_sub_f32(v1 in vector3_f32(), v2 in vector3_f32()) {
            prop_assert_eq!(v1 + v2, Vector3::new(v1.x + v2.x, v1.y + v2.y, v1.z + v2.z));
            prop_assert_eq!(v1 - v2, Vector3::new(v1.x - v2.x, v1.y - v2.y, v1.z - v2.z));
        }

        #[test]
        fn mul_f32(v in vector3_f32(), f in -100.0..100.0f32) {
            let expected = Vector3::new(v.x * f, v.y * f, v.z * f);
            prop_assert_eq!(v * f, expected);
            prop_assert_eq!(f * v, expected);
        }
    }
}
