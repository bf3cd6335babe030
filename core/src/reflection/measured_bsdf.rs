//! Measured BSDF

use super::*;
use crate::error::FitError;
use crate::fitting::FitOptions;
use crate::microfacet::*;
use std::fmt;

/// Lifecycle of a measured surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceState {
    /// Built but not yet registered with the renderer. Every query returns
    /// zero.
    Unconfigured,

    /// Lobes published; queries are served.
    Configured,
}

/// A pair of local shading frame directions and the lobes requested for
/// them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceQuery {
    /// Incident direction (the direction the renderer arrives from).
    pub wi: Vector3f,

    /// Outgoing direction. Ignored by `sample_f`.
    pub wo: Vector3f,

    /// Requested lobes.
    pub type_mask: BxDFType,

    /// Requested component; `None` accepts any.
    pub component: Option<usize>,
}

impl SurfaceQuery {
    /// Returns a query for all lobes and any component.
    ///
    /// * `wi` - Incident direction.
    /// * `wo` - Outgoing direction.
    pub fn new(wi: Vector3f, wo: Vector3f) -> Self {
        Self {
            wi,
            wo,
            type_mask: BxDFType::BSDF_ALL,
            component: None,
        }
    }

    /// Restricts the query to the given lobes.
    ///
    /// * `type_mask` - Requested lobes.
    pub fn with_type_mask(mut self, type_mask: BxDFType) -> Self {
        self.type_mask = type_mask;
        self
    }

    /// Restricts the query to a single component.
    ///
    /// * `component` - Component index.
    pub fn with_component(mut self, component: usize) -> Self {
        self.component = Some(component);
        self
    }

    fn wants_glossy_reflection(&self) -> bool {
        self.type_mask.requests(BxDFType::GLOSSY_REFLECTION)
    }

    fn wants_component_zero(&self) -> bool {
        matches!(self.component, None | Some(0))
    }
}

/// Surface reflectance driven by a compressed fit of measured data. The fit
/// provides the values while a tabulated microfacet distribution extracted
/// from the same data drives importance sampling.
pub struct MeasuredBSDF<M: CompressedBrdf> {
    /// The compressed reflectance model.
    model: M,

    /// Sampling distribution of microfacet normals.
    distribution: TabulatedDistribution,

    /// Published lobes.
    components: Vec<BxDFType>,

    /// Whether the renderer needs ray differentials for this surface.
    uses_ray_differentials: bool,

    /// Lifecycle state.
    state: SurfaceState,
}

impl<M: CompressedBrdf> MeasuredBSDF<M> {
    /// Returns an unconfigured surface.
    ///
    /// * `model`        - The compressed reflectance model.
    /// * `distribution` - Sampling distribution built from the same dataset.
    pub fn new(model: M, distribution: TabulatedDistribution) -> Self {
        Self {
            model,
            distribution,
            components: vec![],
            uses_ray_differentials: false,
            state: SurfaceState::Unconfigured,
        }
    }

    /// Fits the model and extracts the distribution from a table. The table
    /// is not retained.
    ///
    /// * `table`   - The measured table.
    /// * `options` - Fit options.
    pub fn from_table(table: &MerlTable, options: &FitOptions) -> Result<Self, FitError> {
        let model = M::fit(table, &table.name, options)?;
        let distribution = TabulatedDistribution::smith(table)?;
        Ok(Self::new(model, distribution))
    }

    /// Publishes the single glossy reflection lobe. Calling it again has no
    /// further effect.
    pub fn configure(&mut self) {
        self.components = vec![
            BxDFType::BSDF_GLOSSY | BxDFType::BSDF_REFLECTION | BxDFType::BSDF_FRONT_SIDE,
        ];
        self.uses_ray_differentials = false;
        self.state = SurfaceState::Configured;
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Returns the published lobes.
    pub fn components(&self) -> &[BxDFType] {
        &self.components
    }

    /// Returns whether ray differentials are required.
    pub fn uses_ray_differentials(&self) -> bool {
        self.uses_ray_differentials
    }

    /// Measured data has no single roughness value.
    pub fn roughness(&self, _component: usize) -> Float {
        INFINITY
    }

    /// Returns the compressed reflectance model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the sampling distribution.
    pub fn distribution(&self) -> &TabulatedDistribution {
        &self.distribution
    }

    /// Evaluates the cosine-weighted BRDF `f(wo, wi) cos θo`.
    ///
    /// * `query`   - Directions and requested lobes.
    /// * `measure` - Measure of the query.
    pub fn f(&self, query: &SurfaceQuery, measure: Measure) -> Spectrum {
        if self.state != SurfaceState::Configured
            || measure != Measure::SolidAngle
            || !query.wants_glossy_reflection()
            || cos_theta(&query.wi) <= 0.0
            || cos_theta(&query.wo) <= 0.0
        {
            return Spectrum::default();
        }
        self.model.f_projected(&query.wo, &query.wi)
    }

    /// Returns the density of `sample_f` producing `query.wo`.
    ///
    /// * `query`   - Directions and requested lobes.
    /// * `measure` - Measure of the query.
    pub fn pdf(&self, query: &SurfaceQuery, measure: Measure) -> Float {
        if self.state != SurfaceState::Configured
            || measure != Measure::SolidAngle
            || !query.wants_component_zero()
            || !query.wants_glossy_reflection()
            || cos_theta(&query.wi) <= 0.0
            || cos_theta(&query.wo) <= 0.0
        {
            return 0.0;
        }

        // The half vector of grazing pairs underflows in single precision.
        let (wi, wo) = (Vector3d::from(query.wi), Vector3d::from(query.wo));
        let length_squared = (wi + wo).length_squared();
        if !(length_squared > 0.0) {
            return 0.0;
        }
        let h = (wi + wo) / length_squared.sqrt();
        let jacobian = 4.0 * wo.abs_dot(&h);
        if !(jacobian > 0.0) {
            return 0.0;
        }

        let density = self.distribution.pdf(&query.wi, &Vector3f::from(h)) as f64;
        let pdf = (density / jacobian) as Float;
        if pdf.is_finite() {
            pdf
        } else {
            0.0
        }
    }

    /// Samples an outgoing direction by reflecting `query.wi` about a sampled
    /// microfacet normal.
    ///
    /// * `query` - Incident direction and requested lobes.
    /// * `u`     - The 2D uniform random values.
    pub fn sample_f(&self, query: &SurfaceQuery, u: &Point2f) -> SurfaceSample {
        if self.state != SurfaceState::Configured
            || !query.wants_component_zero()
            || !query.wants_glossy_reflection()
            || cos_theta(&query.wi) < 0.0
        {
            return SurfaceSample::from(BxDFType::empty());
        }

        let m = self.distribution.sample_wh(&query.wi, u);
        let wo = reflect(&query.wi, &m);
        if cos_theta(&wo) <= 0.0 {
            return SurfaceSample::glossy_reflection(wo, Spectrum::default(), 0.0);
        }

        let sampled = SurfaceQuery { wo, ..*query };
        let pdf = self.pdf(&sampled, Measure::SolidAngle);
        if !(pdf > 0.0 && pdf.is_finite()) {
            return SurfaceSample::glossy_reflection(wo, Spectrum::default(), 0.0);
        }

        let weight = self.f(&sampled, Measure::SolidAngle) / pdf;
        if !weight.is_finite() {
            return SurfaceSample::glossy_reflection(wo, Spectrum::default(), 0.0);
        }
        SurfaceSample::glossy_reflection(wo, weight, pdf)
    }
}

impl<M: CompressedBrdf> fmt::Display for MeasuredBSDF<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[\n  id = \"{}\",\n]", M::MODEL, self.model.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use crate::testing::*;
    use float_cmp::*;
    use proptest::prelude::*;
    use std::thread;

    lazy_static! {
        static ref SURFACE: MeasuredBSDF<AbcBrdf> = {
            let distribution = TabulatedDistribution::smith(&ABC_TABLE).unwrap();
            let mut surface = MeasuredBSDF::new(reference_abc(), distribution);
            surface.configure();
            surface
        };
    }

    fn up() -> Vector3f {
        Vector3f::new(0.0, 0.0, 1.0)
    }

    fn tilted() -> Vector3f {
        Vector3f::new(0.5, 0.0, 0.75_f32.sqrt())
    }

    #[test]
    fn configure_publishes_glossy_lobe() {
        let distribution = TabulatedDistribution::smith(&ABC_TABLE).unwrap();
        let mut surface = MeasuredBSDF::new(reference_abc(), distribution);
        assert_eq!(surface.state(), SurfaceState::Unconfigured);
        assert!(surface.components().is_empty());

        surface.configure();
        surface.configure();
        assert_eq!(surface.state(), SurfaceState::Configured);
        assert_eq!(
            surface.components(),
            &[BxDFType::BSDF_GLOSSY | BxDFType::BSDF_REFLECTION | BxDFType::BSDF_FRONT_SIDE]
        );
        assert!(!surface.uses_ray_differentials());
        assert_eq!(surface.roughness(0), INFINITY);
        assert_eq!(format!("{}", surface), "ABC[\n  id = \"abc\",\n]");
    }

    #[test]
    fn unconfigured_surface_is_black() {
        let distribution = TabulatedDistribution::smith(&ABC_TABLE).unwrap();
        let surface = MeasuredBSDF::new(reference_abc(), distribution);
        let query = SurfaceQuery::new(up(), tilted());
        assert!(surface.f(&query, Measure::SolidAngle).is_black());
        assert_eq!(surface.pdf(&query, Measure::SolidAngle), 0.0);
        assert_eq!(surface.sample_f(&query, &Point2f::new(0.5, 0.5)).wo, None);
    }

    #[test]
    fn incident_from_below_is_black() {
        let down = Vector3f::new(0.0, 0.0, -1.0);
        let query = SurfaceQuery::new(down, up());
        assert!(SURFACE.f(&query, Measure::SolidAngle).is_black());
        assert_eq!(SURFACE.pdf(&query, Measure::SolidAngle), 0.0);

        let sample = SURFACE.sample_f(&query, &Point2f::new(0.5, 0.5));
        assert_eq!(sample.wo, None);
        assert!(sample.weight.is_black());
        assert_eq!(sample.pdf, 0.0);
    }

    #[test]
    fn outgoing_below_horizon_is_black() {
        let query = SurfaceQuery::new(up(), Vector3f::new(0.6, 0.0, -0.8));
        assert!(SURFACE.f(&query, Measure::SolidAngle).is_black());
        assert_eq!(SURFACE.pdf(&query, Measure::SolidAngle), 0.0);
    }

    #[test]
    fn unsupported_requests_are_black() {
        let query = SurfaceQuery::new(up(), tilted());
        assert!(SURFACE.f(&query, Measure::Discrete).is_black());
        assert_eq!(SURFACE.pdf(&query, Measure::Length), 0.0);

        let diffuse = query.with_type_mask(BxDFType::BSDF_DIFFUSE | BxDFType::BSDF_REFLECTION);
        assert!(SURFACE.f(&diffuse, Measure::SolidAngle).is_black());
        assert_eq!(SURFACE.pdf(&diffuse, Measure::SolidAngle), 0.0);

        let second = query.with_component(1);
        assert_eq!(SURFACE.pdf(&second, Measure::SolidAngle), 0.0);
        assert_eq!(SURFACE.sample_f(&second, &Point2f::new(0.5, 0.5)).wo, None);

        let first = query.with_component(0);
        assert!(SURFACE.pdf(&first, Measure::SolidAngle) > 0.0);
    }

    #[test]
    fn normal_incidence_matches_table() {
        let query = SurfaceQuery::new(up(), up());
        let f = SURFACE.f(&query, Measure::SolidAngle);
        let expected = ABC_TABLE.sample(0, 0, 0).unwrap();
        for c in 0..3 {
            assert!(f[c].is_finite() && f[c] > 0.0);
            let e = expected[c] as Float;
            assert!((f[c] - e).abs() < 0.01 * e, "{} vs {}", f[c], e);
        }
    }

    #[test]
    fn pinned_sample_is_deterministic() {
        let query = SurfaceQuery::new(up(), up());
        let u = Point2f::new(0.5, 0.5);
        let a = SURFACE.sample_f(&query, &u);
        let b = SURFACE.sample_f(&query, &u);
        assert_eq!(a, b);

        let wo = a.wo.unwrap();
        assert!(a.pdf > 0.0);
        assert_eq!(a.sampled_type, BxDFType::GLOSSY_REFLECTION);
        assert_eq!(a.sampled_component, 0);
        assert_eq!(a.eta, 1.0);

        // Median microfacet zenith of the extracted NDF is about 17.96°; the
        // azimuth u = 0.5 reflects into the -x half plane.
        assert!(approx_eq!(Float, wo.x, -0.586528, epsilon = 1e-4), "{wo}");
        assert!(approx_eq!(Float, wo.y, 0.0, epsilon = 1e-5), "{wo}");
        assert!(approx_eq!(Float, wo.z, 0.809929, epsilon = 1e-4), "{wo}");
        assert!(approx_eq!(Float, a.pdf, 0.157078, epsilon = 2e-4), "{}", a.pdf);

        let sampled = SurfaceQuery::new(up(), wo);
        assert_eq!(a.pdf, SURFACE.pdf(&sampled, Measure::SolidAngle));
        let f = SURFACE.f(&sampled, Measure::SolidAngle);
        for c in 0..3 {
            assert!(approx_eq!(f32, a.weight[c], f[c] / a.pdf, ulps = 2));
        }
    }

    #[test]
    fn grazing_directions_stay_finite() {
        for z in [1e-12_f32, 1e-20, 1e-30, 1e-40] {
            let wi = Vector3f::new(1.0, 0.0, z);
            let wo = Vector3f::new(-1.0, 0.0, z);
            let query = SurfaceQuery::new(wi, wo);

            let f = SURFACE.f(&query, Measure::SolidAngle);
            let pdf = SURFACE.pdf(&query, Measure::SolidAngle);
            assert!(f.is_finite() && !f.has_nans(), "z = {z}: f = {f}");
            assert!((0..3).all(|c| f[c] >= 0.0), "z = {z}: f = {f}");
            assert!(pdf.is_finite() && pdf >= 0.0, "z = {z}: pdf = {pdf}");

            let mut rng = RNG::new(11);
            let draws = [Point2f::new(0.0, 0.0), Point2f::new(0.5, 0.5)];
            for u in draws.into_iter().chain((0..64).map(|_| rng.uniform_point2())) {
                let sample = SURFACE.sample_f(&SurfaceQuery::new(wi, wi), &u);
                assert!(sample.pdf.is_finite() && sample.pdf >= 0.0, "z = {z}, u = {u}");
                assert!(sample.weight.is_finite(), "z = {z}, u = {u}");
                assert!((0..3).all(|c| sample.weight[c] >= 0.0), "z = {z}, u = {u}");
            }
        }
    }

    #[test]
    fn huge_model_values_saturate() {
        let wi = Vector3f::new(1.0, 0.0, 1e-30);
        let wo = Vector3f::new(-1.0, 0.0, 1e-30);
        let f = reference_abc().f(&wo, &wi);
        assert!(f.is_finite());
        assert!((0..3).all(|c| f[c] > 0.0 && f[c] <= Float::MAX));
    }

    #[test]
    fn f_is_pure() {
        let query = SurfaceQuery::new(tilted(), Vector3f::new(-0.3, 0.2, 0.866));
        let a = SURFACE.f(&query, Measure::SolidAngle);
        let b = SURFACE.f(&query, Measure::SolidAngle);
        assert_eq!(a, b);
    }

    #[test]
    fn sample_weight_estimates_albedo() {
        let wi = tilted();

        // Reference: midpoint quadrature of f cos θo over the hemisphere.
        let (nt, np) = (400, 800);
        let (dt, dp) = (PI_OVER_TWO / nt as Float, TWO_PI / np as Float);
        let mut reference = [0.0_f64; 3];
        for i in 0..nt {
            let theta = (i as Float + 0.5) * dt;
            let (sin, cos) = theta.sin_cos();
            for j in 0..np {
                let phi = (j as Float + 0.5) * dp;
                let wo = spherical_direction(sin, cos, phi);
                let f = SURFACE.f(&SurfaceQuery::new(wi, wo), Measure::SolidAngle);
                for c in 0..3 {
                    reference[c] += (f[c] * sin * dt * dp) as f64;
                }
            }
        }

        let n = 100_000;
        let mut rng = RNG::new(5);
        let mut estimate = [0.0_f64; 3];
        let query = SurfaceQuery::new(wi, wi);
        for _ in 0..n {
            let sample = SURFACE.sample_f(&query, &rng.uniform_point2());
            for c in 0..3 {
                assert!(sample.weight[c].is_finite() && sample.weight[c] >= 0.0);
                estimate[c] += sample.weight[c] as f64 / n as f64;
            }
        }

        for c in 0..3 {
            assert!(
                (estimate[c] - reference[c]).abs() < 0.05 * reference[c],
                "channel {c}: {} vs {}",
                estimate[c],
                reference[c]
            );
        }
    }

    #[test]
    fn concurrent_queries_agree() {
        let queries: Vec<SurfaceQuery> = (0..64)
            .map(|i| {
                let phi = i as Float * 0.1;
                let wo = spherical_direction(0.6, 0.8, phi);
                SurfaceQuery::new(tilted(), wo)
            })
            .collect();
        let expected: Vec<(Spectrum, Float)> = queries
            .iter()
            .map(|q| (SURFACE.f(q, Measure::SolidAngle), SURFACE.pdf(q, Measure::SolidAngle)))
            .collect();

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for (q, e) in queries.iter().zip(expected.iter()) {
                        assert_eq!(SURFACE.f(q, Measure::SolidAngle), e.0);
                        assert_eq!(SURFACE.pdf(q, Measure::SolidAngle), e.1);
                    }
                });
            }
        });
    }

    proptest! {
        #[test]
        fn queries_are_finite_and_non_negative(
            x0 in -1.0..1.0f32, y0 in -1.0..1.0f32, z0 in -1.0..1.0f32,
            x1 in -1.0..1.0f32, y1 in -1.0..1.0f32, z1 in -1.0..1.0f32,
            u0 in 0.0..1.0f32, u1 in 0.0..1.0f32,
        ) {
            let wi = Vector3f::new(x0, y0, z0);
            let wo = Vector3f::new(x1, y1, z1);
            prop_assume!(wi.length() > 0.1 && wo.length() > 0.1);
            let query = SurfaceQuery::new(wi.normalize(), wo.normalize());

            let f = SURFACE.f(&query, Measure::SolidAngle);
            let pdf = SURFACE.pdf(&query, Measure::SolidAngle);
            prop_assert!(f.is_finite() && f.to_rgb().iter().all(|v| *v >= 0.0));
            prop_assert!(pdf.is_finite() && pdf >= 0.0);

            let sample = SURFACE.sample_f(&query, &Point2f::new(u0, u1));
            prop_assert!(sample.weight.is_finite());
            prop_assert!(sample.pdf.is_finite() && sample.pdf >= 0.0);
        }
    }
}
