//! SGD Model

use super::*;
use crate::error::FitError;
use crate::fitting::*;
use std::f64::consts::{FRAC_1_PI, LN_2, PI as PI_F64};
use std::fmt;

/// Fresnel reflectance at normal incidence assumed for the initial guess.
const INITIAL_F0: f64 = 0.04;

/// Simpson intervals used for the NDF normalization constant.
const NORMALIZATION_STEPS: usize = 1024;

/// Allowed range of the roughness `α`.
const ALPHA_RANGE: (f64, f64) = (1e-4, 10.0);

/// Natural parameters of the SGD model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SgdParams {
    /// Diffuse albedo.
    pub kd: [f64; 3],

    /// Specular albedo.
    pub ks: [f64; 3],

    /// Roughness.
    pub alpha: f64,

    /// Shape exponent of the distribution tail, in (0, 2).
    pub p: f64,

    /// Fresnel reflectance at normal incidence, in (0, 1).
    pub f0: f64,
}

/// Shifted-gamma distribution model of Bagher et al.:
///
/// `f = kd / π + ks D(θh) F(F0, cos θd) G1(wi) G1(wo) / (4 cos θi cos θo)`
///
/// `D = exp(-(α² + t) / α) / (Z (α² + t)^p π cos⁴θh)` with `t = tan²θh`.
#[derive(Clone, Debug)]
pub struct SgdBrdf {
    /// Dataset name.
    name: String,

    /// Fitted parameters.
    params: SgdParams,

    /// Normalization constant `Z` of the distribution.
    norm: f64,
}

impl SgdBrdf {
    /// Returns a model with known parameters.
    ///
    /// * `name`   - Dataset name.
    /// * `params` - Model parameters.
    pub fn from_params(name: &str, params: SgdParams) -> Self {
        Self {
            name: name.to_string(),
            params,
            norm: normalization(params.alpha, params.p),
        }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &SgdParams {
        &self.params
    }

    /// Returns the unconstrained parameter vector
    /// `[ln kd (3), ln ks (3), ln α, logit(p / 2), logit(F0)]`.
    pub fn unconstrained(&self) -> Vec<f64> {
        let p = &self.params;
        let mut q: Vec<f64> = p.kd.iter().chain(p.ks.iter()).map(|v| v.ln()).collect();
        q.extend([p.alpha.ln(), logit(0.5 * p.p), logit(p.f0)]);
        q
    }

    /// Evaluates the normalized distribution of microfacet normals.
    ///
    /// * `cos_h` - Cosine of the microfacet normal zenith.
    pub fn d(&self, cos_h: f64) -> f64 {
        if cos_h <= 1e-8 {
            return 0.0;
        }
        let SgdParams { alpha, p, .. } = self.params;
        let cos2 = cos_h * cos_h;
        let shifted = alpha * alpha + (1.0 - cos2) / cos2;
        (-shifted / alpha).exp() / (shifted.powf(p) * PI_F64 * cos2 * cos2 * self.norm)
    }

    /// Smith-form masking with `α` as the squared roughness.
    fn g1(&self, cos_theta: f64) -> f64 {
        let c2 = cos_theta * cos_theta;
        2.0 * cos_theta / (cos_theta + (c2 + self.params.alpha * (1.0 - c2)).sqrt())
    }
}

impl CompressedBrdf for SgdBrdf {
    const MODEL: &'static str = "SGD";

    fn fit(table: &MerlTable, name: &str, options: &FitOptions) -> Result<Self, FitError> {
        fit_model(table, name, options)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, wo: &Vector3d, wi: &Vector3d) -> [f64; 3] {
        let Some((cos_i, cos_o, cos_h, cos_d)) = half_vector_cosines(wo, wi) else {
            return [0.0; 3];
        };

        let p = &self.params;
        let specular = self.d(cos_h) * fr_schlick(p.f0, cos_d) * self.g1(cos_i) * self.g1(cos_o)
            / (4.0 * cos_i * cos_o);
        sanitize([0, 1, 2].map(|c| p.kd[c] * FRAC_1_PI + p.ks[c] * specular))
    }
}

impl ParametricBrdf for SgdBrdf {
    fn initial_parameters(table: &MerlTable) -> Vec<f64> {
        let profile = retro_profile(table);
        let kd = diffuse_estimate(&profile);
        let theta_half = half_width_estimate(&profile, &kd);

        // exp(-t / α) halves at tan²θ½.
        let tan = theta_half.tan();
        let alpha = clamp(tan * tan / LN_2, ALPHA_RANGE.0, ALPHA_RANGE.1);
        let shape = Self::from_params(
            &table.name,
            SgdParams {
                kd,
                ks: [1.0; 3],
                alpha,
                p: 0.5,
                f0: INITIAL_F0,
            },
        );

        // At normal incidence the specular term is ks D(0) F0 / 4.
        let d0 = shape.d(1.0);
        let peak = profile[0].1;
        let ks = [0, 1, 2]
            .map(|c| max(peak[c] - kd[c] * FRAC_1_PI, 1e-4) * 4.0 / (d0 * INITIAL_F0));

        Self::from_params(
            &table.name,
            SgdParams {
                ks,
                ..shape.params
            },
        )
        .unconstrained()
    }

    fn from_unconstrained(name: &str, q: &[f64]) -> Self {
        Self::from_params(
            name,
            SgdParams {
                kd: [q[0].exp(), q[1].exp(), q[2].exp()],
                ks: [q[3].exp(), q[4].exp(), q[5].exp()],
                alpha: clamp(q[6].exp(), ALPHA_RANGE.0, ALPHA_RANGE.1),
                p: 2.0 * sigmoid(q[7]),
                f0: sigmoid(q[8]),
            },
        )
    }

    fn is_valid(&self) -> bool {
        let p = &self.params;
        p.kd.iter()
            .chain(p.ks.iter())
            .all(|v| v.is_finite() && *v >= 0.0)
            && p.alpha.is_finite()
            && p.alpha > 0.0
            && (0.0..=2.0).contains(&p.p)
            && (0.0..=1.0).contains(&p.f0)
            && self.norm.is_finite()
            && self.norm > 0.0
    }
}

impl fmt::Display for SgdBrdf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = &self.params;
        write!(
            f,
            "SGD {{ name: {}, kd: {:?}, ks: {:?}, alpha: {}, p: {}, F0: {} }}",
            self.name, p.kd, p.ks, p.alpha, p.p, p.f0
        )
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
fn logit(y: f64) -> f64 {
    (y / (1.0 - y)).ln()
}

/// Returns `Z = ∫ exp(-(α² + t) / α) (α² + t)^-p dt` over `t ∈ [0, ∞)`.
///
/// Substituting `s = α² e^v` spreads the integrand evenly for every `α`; the
/// range stops at `s = 50 α` where `e^(-s / α)` is negligible.
fn normalization(alpha: f64, p: f64) -> f64 {
    let a2 = alpha * alpha;
    let v_max = (50.0 / alpha).ln();
    let h = v_max / NORMALIZATION_STEPS as f64;
    let integrand = |v: f64| {
        let s = a2 * v.exp();
        (-s / alpha).exp() * s.powf(1.0 - p)
    };

    let mut sum = integrand(0.0) + integrand(v_max);
    for i in 1..NORMALIZATION_STEPS {
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += w * integrand(i as f64 * h);
    }
    sum * h / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn normalization_matches_closed_form() {
        // p = 0: Z = α exp(-α).
        let alpha = 0.3;
        assert!(approx_eq!(
            f64,
            normalization(alpha, 0.0),
            alpha * (-alpha).exp(),
            epsilon = 1e-9
        ));
    }

    #[test]
    fn distribution_is_normalized() {
        let brdf = reference_sgd();
        // ∫ D cos θ dω over the hemisphere by the midpoint rule.
        let steps = 20_000;
        let dt = PI_F64 * 0.5 / steps as f64;
        let integral: f64 = (0..steps)
            .map(|i| {
                let theta = (i as f64 + 0.5) * dt;
                let (sin, cos) = theta.sin_cos();
                2.0 * PI_F64 * brdf.d(cos) * cos * sin * dt
            })
            .sum();
        assert!(approx_eq!(f64, integral, 1.0, epsilon = 1e-3));
    }

    #[test]
    fn zero_below_horizon() {
        let brdf = reference_sgd();
        let up = Vector3d::new(0.0, 0.0, 1.0);
        let down = Vector3d::new(0.0, 0.6, -0.8);
        assert_eq!(brdf.eval(&up, &down), [0.0; 3]);
        assert_eq!(brdf.eval(&down, &up), [0.0; 3]);
        assert_eq!(brdf.d(-0.5), 0.0);
    }

    #[test]
    fn unconstrained_round_trip() {
        let brdf = reference_sgd();
        let back = SgdBrdf::from_unconstrained("sgd", &brdf.unconstrained());
        let (a, b) = (brdf.params(), back.params());
        assert!(approx_eq!(f64, a.alpha, b.alpha, epsilon = 1e-12));
        assert!(approx_eq!(f64, a.p, b.p, epsilon = 1e-12));
        assert!(approx_eq!(f64, a.f0, b.f0, epsilon = 1e-12));
        assert!(back.is_valid());
    }

    #[test]
    fn fit_recovers_generating_model() {
        let reference = reference_sgd();
        let fitted = SgdBrdf::fit(&SGD_TABLE, "sgd", &FitOptions::coarse()).unwrap();
        assert!(fitted.is_valid());

        let up = Vector3d::new(0.0, 0.0, 1.0);
        let wo = Vector3d::new(0.3, 0.0, 0.91_f64.sqrt());
        let wi = Vector3d::new(-0.2, 0.1, 0.95_f64.sqrt());
        for (a, b) in [(up, up), (wo, wi), (wo, up)] {
            let expected = reference.eval(&a, &b);
            let actual = fitted.eval(&a, &b);
            for c in 0..3 {
                assert!(
                    (actual[c] - expected[c]).abs() < 0.1 * expected[c],
                    "channel {c}: {} vs {}",
                    actual[c],
                    expected[c]
                );
            }
        }
        assert!(format!("{}", fitted).starts_with("SGD {"));
    }

    proptest! {
        #[test]
        fn non_negative(
            x0 in -1.0..1.0f64, y0 in -1.0..1.0f64, z0 in -1.0..1.0f64,
            x1 in -1.0..1.0f64, y1 in -1.0..1.0f64, z1 in -1.0..1.0f64,
        ) {
            let wo = Vector3d::new(x0, y0, z0);
            let wi = Vector3d::new(x1, y1, z1);
            prop_assume!(wo.length() > 0.1 && wi.length() > 0.1);

            let f = reference_sgd().eval(&wo.normalize(), &wi.normalize());
            prop_assert!(f.iter().all(|v| v.is_finite() && *v >= 0.0));
        }
    }
}
