//! Material

use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::spectrum::*;
use std::fmt;
use std::sync::Arc;

/// Material trait provides the surface interface the renderer talks to. All
/// directions are in the local shading frame.
pub trait Material: fmt::Display + Send + Sync {
    /// Publishes the lobes of the material. Must be called once before
    /// queries are served; further calls have no effect.
    fn configure(&mut self);

    /// Returns the published lobes.
    fn components(&self) -> &[BxDFType];

    /// Returns whether the material needs ray differentials.
    fn uses_ray_differentials(&self) -> bool;

    /// Returns the roughness of a component.
    ///
    /// * `component` - Component index.
    fn roughness(&self, component: usize) -> Float;

    /// Evaluates the cosine-weighted BSDF.
    ///
    /// * `query`   - Directions and requested lobes.
    /// * `measure` - Measure of the query.
    fn f(&self, query: &SurfaceQuery, measure: Measure) -> Spectrum;

    /// Returns the density of `sample_f` producing `query.wo`.
    ///
    /// * `query`   - Directions and requested lobes.
    /// * `measure` - Measure of the query.
    fn pdf(&self, query: &SurfaceQuery, measure: Measure) -> Float;

    /// Importance samples an outgoing direction.
    ///
    /// * `query` - Incident direction and requested lobes.
    /// * `u`     - The 2D uniform random values.
    fn sample_f(&self, query: &SurfaceQuery, u: &Point2f) -> SurfaceSample;

    /// Returns GLSL source previewing the material.
    ///
    /// * `eval_name` - Name of the generated function.
    /// * `dep_names` - Names of functions the material depends on.
    fn shader_code(&self, eval_name: &str, dep_names: &[String]) -> String;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material>;
