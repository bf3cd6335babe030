//! Surface Sample

use super::*;

/// Result of importance sampling a surface.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SurfaceSample {
    /// The sampled outgoing direction; `None` if the request was not served.
    pub wo: Option<Vector3f>,

    /// Sample weight `f / pdf`; zero for rejected samples.
    pub weight: Spectrum,

    /// Density of `wo` in solid angle measure.
    pub pdf: Float,

    /// The lobe that was sampled.
    pub sampled_type: BxDFType,

    /// Index of the sampled component.
    pub sampled_component: usize,

    /// Relative index of refraction along the sampled path.
    pub eta: Float,
}

impl SurfaceSample {
    /// Returns a sample drawn from the glossy reflection lobe.
    ///
    /// * `wo`     - The sampled outgoing direction.
    /// * `weight` - Sample weight.
    /// * `pdf`    - Density of `wo`.
    pub fn glossy_reflection(wo: Vector3f, weight: Spectrum, pdf: Float) -> Self {
        Self {
            wo: Some(wo),
            weight,
            pdf,
            sampled_type: BxDFType::GLOSSY_REFLECTION,
            sampled_component: 0,
            eta: 1.0,
        }
    }

    /// Returns true if a direction was produced and carries non-zero weight.
    pub fn is_valid(&self) -> bool {
        self.wo.is_some() && !self.weight.is_black()
    }
}

impl From<BxDFType> for SurfaceSample {
    /// Returns an empty sample that only records the lobe type.
    ///
    /// * `sampled_type` - The lobe type.
    fn from(sampled_type: BxDFType) -> Self {
        Self {
            sampled_type,
            eta: 1.0,
            ..Self::default()
        }
    }
}
