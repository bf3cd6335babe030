//! BxDF Type

use bitflags::bitflags;

bitflags! {
    /// Stores combinations of reflection lobe flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct BxDFType: u8 {
        const BSDF_REFLECTION = 1;
        const BSDF_TRANSMISSION = 2;
        const BSDF_DIFFUSE = 4;
        const BSDF_GLOSSY = 8;
        const BSDF_SPECULAR = 16;
        /// Lobe only responds on the side the shading normal points to.
        const BSDF_FRONT_SIDE = 32;
        const BSDF_ALL = Self::BSDF_REFLECTION.bits()
            | Self::BSDF_TRANSMISSION.bits()
            | Self::BSDF_DIFFUSE.bits()
            | Self::BSDF_GLOSSY.bits()
            | Self::BSDF_SPECULAR.bits();
    }
}

impl BxDFType {
    /// The single lobe exposed by measured surfaces.
    pub const GLOSSY_REFLECTION: Self = Self::BSDF_GLOSSY.union(Self::BSDF_REFLECTION);

    /// Returns true if all the flags of `lobe` are requested.
    ///
    /// * `lobe` - The lobe flags to test.
    pub fn requests(&self, lobe: BxDFType) -> bool {
        self.contains(lobe)
    }
}

/// Measure a query density or value is expressed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Measure {
    /// Solid angle measure; the only one glossy lobes respond to.
    SolidAngle,

    /// Length measure (used by some host renderers for 1-D lobes).
    Length,

    /// Discrete measure (delta lobes).
    Discrete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glossy_reflection_requests() {
        assert!(BxDFType::BSDF_ALL.requests(BxDFType::GLOSSY_REFLECTION));
        assert!(BxDFType::GLOSSY_REFLECTION.requests(BxDFType::GLOSSY_REFLECTION));
        assert!(!BxDFType::BSDF_GLOSSY.requests(BxDFType::GLOSSY_REFLECTION));
        assert!(!(BxDFType::BSDF_DIFFUSE | BxDFType::BSDF_REFLECTION)
            .requests(BxDFType::GLOSSY_REFLECTION));
    }
}
