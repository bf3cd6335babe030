//! MERL BRDF Table

use super::merl_reader::*;
use crate::error::LoadError;
use crate::fileutil::dataset_name;
use crate::geometry::*;
use crate::pbrt::*;
use itertools::iproduct;
use std::f64::consts::{FRAC_PI_2, PI as PI_F64};
use std::io::{Read, Write};

/// Number of half-vector zenith bins.
pub const THETA_H_RES: usize = 90;

/// Number of difference-vector zenith bins.
pub const THETA_D_RES: usize = 90;

/// Number of difference-vector azimuth bins. Reciprocity folds φd into [0, π).
pub const PHI_D_RES: usize = 180;

/// Total number of samples per colour channel.
pub const MERL_SAMPLE_COUNT: usize = THETA_H_RES * THETA_D_RES * PHI_D_RES;

/// Scale factors applied to the stored red, green and blue samples.
pub const MERL_SCALE: [f64; 3] = [1.0 / 1500.0, 1.15 / 1500.0, 1.66 / 1500.0];

/// Returns the (non-linear) bin index for a half-vector zenith angle.
///
/// * `theta_h` - Zenith angle of the half-vector in radians.
#[inline]
pub fn theta_half_index(theta_h: f64) -> usize {
    if !(theta_h > 0.0) {
        return 0;
    }
    let theta_h_deg = theta_h / FRAC_PI_2 * THETA_H_RES as f64;
    let index = (theta_h_deg * THETA_H_RES as f64).sqrt() as usize;
    min(index, THETA_H_RES - 1)
}

/// Returns the bin index for a difference-vector zenith angle.
///
/// * `theta_d` - Zenith angle of the difference vector in radians.
#[inline]
pub fn theta_diff_index(theta_d: f64) -> usize {
    let index = (theta_d / FRAC_PI_2 * THETA_D_RES as f64) as i64;
    clamp(index, 0, THETA_D_RES as i64 - 1) as usize
}

/// Returns the bin index for a difference-vector azimuth angle.
///
/// * `phi_d` - Azimuth of the difference vector in radians, in [-π, π].
#[inline]
pub fn phi_diff_index(phi_d: f64) -> usize {
    // The BRDF is unchanged under φd -> φd + π.
    let phi_d = if phi_d < 0.0 { phi_d + PI_F64 } else { phi_d };
    let index = (phi_d / PI_F64 * PHI_D_RES as f64) as i64;
    clamp(index, 0, PHI_D_RES as i64 - 1) as usize
}

/// Returns the half/difference angles at the centre of a table bin as
/// `(θh, θd, φd)`.
///
/// * `ih` - Half-vector zenith bin.
/// * `id` - Difference-vector zenith bin.
/// * `ip` - Difference-vector azimuth bin.
#[inline]
pub fn bin_center(ih: usize, id: usize, ip: usize) -> (f64, f64, f64) {
    let u = (ih as f64 + 0.5) / THETA_H_RES as f64;
    (
        u * u * FRAC_PI_2,
        (id as f64 + 0.5) / THETA_D_RES as f64 * FRAC_PI_2,
        (ip as f64 + 0.5) / PHI_D_RES as f64 * PI_F64,
    )
}

/// Half/difference parameterization of a direction pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfDiff {
    /// Zenith of the half-vector.
    pub theta_h: f64,

    /// Azimuth of the half-vector.
    pub phi_h: f64,

    /// Zenith of the difference vector.
    pub theta_d: f64,

    /// Azimuth of the difference vector.
    pub phi_d: f64,
}

impl HalfDiff {
    /// Converts an incident/outgoing pair to half/difference angles.
    ///
    /// * `wi` - Incident direction.
    /// * `wo` - Outgoing direction.
    pub fn from_directions(wi: &Vector3d, wo: &Vector3d) -> Self {
        let h = (*wi + *wo).normalize();
        let theta_h = clamp(h.z, -1.0, 1.0).acos();
        let phi_h = h.y.atan2(h.x);

        let d = rotate_y(&rotate_z(wi, -phi_h), -theta_h);
        let theta_d = clamp(d.z, -1.0, 1.0).acos();
        let phi_d = d.y.atan2(d.x);

        Self {
            theta_h,
            phi_h,
            theta_d,
            phi_d,
        }
    }

    /// Converts half/difference angles back to an incident/outgoing pair
    /// `(wi, wo)`.
    pub fn to_directions(&self) -> (Vector3d, Vector3d) {
        let (sin_d, cos_d) = self.theta_d.sin_cos();
        let d = spherical_direction(sin_d, cos_d, self.phi_d);
        let wi = rotate_z(&rotate_y(&d, self.theta_h), self.phi_h);

        let (sin_h, cos_h) = self.theta_h.sin_cos();
        let h = spherical_direction(sin_h, cos_h, self.phi_h);
        let wo = 2.0 * wi.dot(&h) * h - wi;
        (wi, wo)
    }
}

/// Stores a dense MERL measured BRDF table.
#[derive(Clone)]
pub struct MerlTable {
    /// Dataset name derived from the source file's base name.
    pub name: String,

    /// Unscaled samples in three colour planes (red, green, blue) of
    /// `MERL_SAMPLE_COUNT` values each. Negative values mark missing samples.
    data: Vec<f64>,
}

impl MerlTable {
    /// Loads a `MerlTable` from a binary file. The dataset name is the file's
    /// base name up to the first `.`.
    ///
    /// * `path` - The path to the MERL binary file.
    pub fn from_file(path: &str) -> Result<Self, LoadError> {
        let mut file = open_file(path).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;

        let table = Self::parse(path, dataset_name(path), &mut file)?;
        info!("Loaded MERL table '{}' from '{}'", table.name, path);
        Ok(table)
    }

    /// Loads a `MerlTable` from any reader.
    ///
    /// * `name`   - Dataset name; also used to identify the source in errors.
    /// * `reader` - The reader positioned at the start of the header.
    pub fn from_reader<R: Read>(name: &str, reader: &mut R) -> Result<Self, LoadError> {
        Self::parse(name, name.to_string(), reader)
    }

    fn parse<R: Read>(path: &str, name: String, reader: &mut R) -> Result<Self, LoadError> {
        let dims = reader.read_dims().map_err(|source| LoadError::Truncated {
            path: path.to_string(),
            source,
        })?;

        let n = dims.iter().map(|d| *d as i64).product::<i64>();
        if dims.iter().any(|d| *d <= 0) || n != MERL_SAMPLE_COUNT as i64 {
            return Err(LoadError::InvalidDimensions {
                path: path.to_string(),
                dims,
                expected: MERL_SAMPLE_COUNT,
            });
        }

        let data = reader
            .read_f64_vec(3 * MERL_SAMPLE_COUNT)
            .map_err(|source| LoadError::Truncated {
                path: path.to_string(),
                source,
            })?;

        Ok(Self { name, data })
    }

    /// Tabulates an analytic BRDF at the bin centres. The function receives
    /// `(wi, wo)` and returns RGB reflectance; negative values mark a bin as
    /// missing.
    ///
    /// * `name` - Dataset name.
    /// * `f`    - The BRDF.
    pub fn from_fn<F>(name: &str, f: F) -> Self
    where
        F: Fn(&Vector3d, &Vector3d) -> [f64; 3],
    {
        let mut data = vec![0.0; 3 * MERL_SAMPLE_COUNT];
        for (ih, id, ip) in iproduct!(0..THETA_H_RES, 0..THETA_D_RES, 0..PHI_D_RES) {
            let (theta_h, theta_d, phi_d) = bin_center(ih, id, ip);
            let hd = HalfDiff {
                theta_h,
                phi_h: 0.0,
                theta_d,
                phi_d,
            };
            let (wi, wo) = hd.to_directions();
            let rgb = f(&wi, &wo);

            let index = Self::offset(ih, id, ip);
            for c in 0..3 {
                data[index + c * MERL_SAMPLE_COUNT] = rgb[c] / MERL_SCALE[c];
            }
        }
        Self {
            name: name.to_string(),
            data,
        }
    }

    /// Writes the table in the MERL binary layout.
    ///
    /// * `path` - Output file path.
    pub fn write(&self, path: &str) -> Result<(), LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_string(),
            source,
        };

        let mut file = create_file(path).map_err(io_err)?;
        file.write_dims([THETA_H_RES as i32, THETA_D_RES as i32, PHI_D_RES as i32])
            .map_err(io_err)?;
        file.write_f64_slice(&self.data).map_err(io_err)?;
        file.flush().map_err(io_err)
    }

    #[inline]
    fn offset(ih: usize, id: usize, ip: usize) -> usize {
        ip + id * PHI_D_RES + ih * PHI_D_RES * THETA_D_RES
    }

    /// Returns the scaled RGB sample of a bin, or `None` if the bin is
    /// missing.
    ///
    /// * `ih` - Half-vector zenith bin.
    /// * `id` - Difference-vector zenith bin.
    /// * `ip` - Difference-vector azimuth bin.
    pub fn sample(&self, ih: usize, id: usize, ip: usize) -> Option<[f64; 3]> {
        let index = Self::offset(ih, id, ip);
        let mut rgb = [0.0; 3];
        for c in 0..3 {
            let v = self.data[index + c * MERL_SAMPLE_COUNT];
            if !(v >= 0.0) {
                return None;
            }
            rgb[c] = v * MERL_SCALE[c];
        }
        Some(rgb)
    }

    /// Returns the retro-reflection (θd = 0) sample for a half-vector zenith
    /// angle. Missing samples read as zero.
    ///
    /// * `theta_h` - Zenith angle.
    pub fn retro_reflection(&self, theta_h: f64) -> [f64; 3] {
        self.sample(theta_half_index(theta_h), 0, 0)
            .unwrap_or([0.0; 3])
    }

    /// Looks up the nearest bin for a direction pair. Returns zero when
    /// either direction is below the horizon or the bin is missing.
    ///
    /// * `wi` - Incident direction.
    /// * `wo` - Outgoing direction.
    pub fn lookup(&self, wi: &Vector3d, wo: &Vector3d) -> [f64; 3] {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return [0.0; 3];
        }

        let hd = HalfDiff::from_directions(wi, wo);
        self.sample(
            theta_half_index(hd.theta_h),
            theta_diff_index(hd.theta_d),
            phi_diff_index(hd.phi_d),
        )
        .unwrap_or([0.0; 3])
    }
}
