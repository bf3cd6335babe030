//! ABC Model

use super::*;
use crate::error::FitError;
use crate::fitting::*;
use std::f64::consts::FRAC_1_PI;
use std::fmt;

/// Fresnel reflectance at normal incidence assumed for the initial guess
/// (η = 1.5).
const INITIAL_F0: f64 = 0.04;

/// Natural parameters of the ABC model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AbcParams {
    /// Diffuse albedo.
    pub kd: [f64; 3],

    /// Specular amplitude.
    pub a: [f64; 3],

    /// Inverse lobe width.
    pub b: f64,

    /// Tail fall-off exponent.
    pub c: f64,

    /// Relative index of refraction of the surface.
    pub eta: f64,
}

/// Smooth-surface model of Löw et al.:
///
/// `f = kd / π + S(θh) F(η, cos θd) G(wi, wo) / (cos θi cos θo)`
///
/// with `S = A / (1 + B (1 - cos θh))^C` and V-cavity shadowing `G`.
#[derive(Clone, Debug)]
pub struct AbcBrdf {
    /// Dataset name.
    name: String,

    /// Fitted parameters.
    params: AbcParams,
}

impl AbcBrdf {
    /// Returns a model with known parameters.
    ///
    /// * `name`   - Dataset name.
    /// * `params` - Model parameters.
    pub fn from_params(name: &str, params: AbcParams) -> Self {
        Self {
            name: name.to_string(),
            params,
        }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &AbcParams {
        &self.params
    }

    /// Returns the unconstrained parameter vector
    /// `[ln kd (3), ln A (3), ln B, ln C, ln(η - 1)]`.
    pub fn unconstrained(&self) -> Vec<f64> {
        let p = &self.params;
        let mut q: Vec<f64> = p.kd.iter().chain(p.a.iter()).map(|v| v.ln()).collect();
        q.extend([p.b.ln(), p.c.ln(), (p.eta - 1.0).ln()]);
        q
    }
}

impl CompressedBrdf for AbcBrdf {
    const MODEL: &'static str = "ABC";

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
        let s = (1.0 + p.b * (1.0 - cos_h)).powf(-p.c);
        let fresnel = fr_dielectric(cos_d, 1.0, p.eta);

        let cos_d = max(cos_d, 1e-12);
        let g = min(1.0, min(2.0 * cos_h * cos_o / cos_d, 2.0 * cos_h * cos_i / cos_d));

        let specular = s * fresnel * g / (cos_i * cos_o);
        sanitize([0, 1, 2].map(|c| p.kd[c] * FRAC_1_PI + p.a[c] * specular))
    }
}

impl ParametricBrdf for AbcBrdf {
    fn initial_parameters(table: &MerlTable) -> Vec<f64> {
        let profile = retro_profile(table);
        let kd = diffuse_estimate(&profile);
        let theta_half = half_width_estimate(&profile, &kd);

        let peak = profile[0].1;
        let a = [0, 1, 2].map(|c| max(peak[c] - kd[c] * FRAC_1_PI, 1e-4) / INITIAL_F0);

        // S falls to half at θ½ when C = 1.
        let b = 1.0 / max(1.0 - theta_half.cos(), 1e-6);

        Self::from_params(
            &table.name,
            AbcParams {
                kd,
                a,
                b,
                c: 1.0,
                eta: 1.5,
            },
        )
        .unconstrained()
    }

    fn from_unconstrained(name: &str, q: &[f64]) -> Self {
        Self::from_params(
            name,
            AbcParams {
                kd: [q[0].exp(), q[1].exp(), q[2].exp()],
                a: [q[3].exp(), q[4].exp(), q[5].exp()],
                b: q[6].exp(),
                c: q[7].exp(),
                eta: 1.0 + q[8].exp(),
            },
        )
    }

    fn is_valid(&self) -> bool {
        let p = &self.params;
        p.kd.iter()
            .chain(p.a.iter())
            .chain([p.b, p.c].iter())
            .all(|v| v.is_finite() && *v >= 0.0)
            && p.eta.is_finite()
            && p.eta > 1.0
    }
}

impl fmt::Display for AbcBrdf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = &self.params;
        write!(
            f,
            "ABC {{ name: {}, kd: {:?}, A: {:?}, B: {}, C: {}, eta: {} }}",
            self.name, p.kd, p.a, p.b, p.c, p.eta
        )
    }
}
