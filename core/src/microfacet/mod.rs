//! Microfacet Distribution Models

use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;

mod tabulated;

// Re-exports
pub use tabulated::*;

/// Interface for microfacet distribution models used as importance sampling
/// proxies of measured reflectance.
pub trait MicrofacetDistribution {
    /// Returns true if `sample_wh` draws visible normals (density depends on
    /// the viewing direction) instead of plain `D(wh) cos θh`.
    fn samples_visible_area(&self) -> bool;

    /// Return the differential area of microfacets oriented with the surface
    /// normal `wh`.
    ///
    /// * `wh` - A microfacet normal.
    fn d(&self, wh: &Vector3f) -> Float;

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `w` - The viewing direction.
    fn lambda(&self, w: &Vector3f) -> Float;

    /// Evaluates Smith's masking function, the fraction of microfacets that
    /// are visible from a given direction.
    ///
    /// * `w` - The viewing direction.
    fn g1(&self, w: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Returns the fraction of microfacets visible from both directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Returns a microfacet normal drawn from the distribution.
    ///
    /// * `w` - The viewing direction.
    /// * `u` - The 2D uniform random values.
    fn sample_wh(&self, w: &Vector3f, u: &Point2f) -> Vector3f;

    /// Evaluates the density of `sample_wh` returning `wh` for the given
    /// viewing direction.
    ///
    /// * `w`  - The viewing direction.
    /// * `wh` - A microfacet normal.
    fn pdf(&self, w: &Vector3f, wh: &Vector3f) -> Float {
        if self.samples_visible_area() {
            self.d(wh) * self.g1(w) * w.abs_dot(wh) / abs_cos_theta(w)
        } else {
            self.d(wh) * abs_cos_theta(wh)
        }
    }
}
