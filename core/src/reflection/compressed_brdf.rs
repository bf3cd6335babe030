//! Compressed BRDF

use super::*;
use crate::error::FitError;
use crate::fitting::FitOptions;
use std::fmt;

/// Interface for compact analytic models fitted to a measured table.
pub trait CompressedBrdf: fmt::Display + Send + Sync + Sized {
    /// Short model name used in descriptions and logs.
    const MODEL: &'static str;

    /// Fits the model to a measured table.
    ///
    /// * `table`   - The measured table.
    /// * `name`    - Dataset name the fitted parameters are keyed by.
    /// * `options` - Fit options.
    fn fit(table: &MerlTable, name: &str, options: &FitOptions) -> Result<Self, FitError>;

    /// Returns the dataset name.
    fn name(&self) -> &str;

    /// Evaluates the model in double precision. Returns non-negative finite
    /// RGB values for any pair of directions and zero when either is on or
    /// below the horizon.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn eval(&self, wo: &Vector3d, wi: &Vector3d) -> [f64; 3];

    /// Evaluates the BRDF.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        narrow(self.eval(&Vector3d::from(*wo), &Vector3d::from(*wi)))
    }

    /// Evaluates the BRDF multiplied by the cosine of the outgoing direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn f_projected(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let cos_o = cos_theta(wo);
        if cos_o <= 0.0 {
            return Spectrum::default();
        }
        let rgb = self.eval(&Vector3d::from(*wo), &Vector3d::from(*wi));
        narrow(rgb.map(|v| v * cos_o as f64))
    }
}

/// Converts double precision RGB to a `Spectrum`, saturating at the largest
/// finite `Float`.
#[inline]
pub(crate) fn narrow(rgb: [f64; 3]) -> Spectrum {
    Spectrum::from(sanitize(rgb).map(|v| min(v, Float::MAX as f64)))
}

/// Replaces negative and non-finite values with zero.
#[inline]
pub(crate) fn sanitize(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
}

/// Returns the cosines `(cos θi, cos θo, cos θh, cos θd)` of a pair of
/// directions and their half vector, or `None` if either direction is on or
/// below the horizon.
#[inline]
pub(crate) fn half_vector_cosines(wo: &Vector3d, wi: &Vector3d) -> Option<(f64, f64, f64, f64)> {
    let (cos_i, cos_o) = (wi.z, wo.z);
    if !(cos_i > 0.0 && cos_o > 0.0) {
        return None;
    }
    let h = (*wi + *wo).normalize();
    let cos_d = clamp(wi.dot(&h), 0.0, 1.0);
    Some((cos_i, cos_o, clamp(h.z, 0.0, 1.0), cos_d))
}
