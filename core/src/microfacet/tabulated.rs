//! Tabulated Microfacet Distribution

use super::*;
use crate::error::FitError;
use crate::sampling::PiecewiseLinear1D;
use std::f64::consts::{FRAC_PI_2, PI as PI_F64};
use std::fmt;

/// Default number of zenith nodes.
pub const DEFAULT_ZENITH_SAMPLES: usize = 90;

/// Fixed-point iterations used to undo the shadowing in the retro-reflection
/// data.
const SHADOWING_ITERATIONS: usize = 8;

/// Minimum NDF value relative to the peak. Keeps the support on the whole
/// hemisphere so any reflection configuration has a non-zero density.
const SUPPORT_FLOOR: f64 = 1e-6;

/// Quadrature bands per node segment when computing projected areas.
const BAND_SUBDIVISIONS: usize = 4;

/// Shadowing assumption used to extract the NDF from measured data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShadowingModel {
    /// Smith's uncorrelated masking: `G1(w) = cos θ / σ(w)` where `σ` is the
    /// projected microfacet area.
    Smith,
}

/// An isotropic NDF tabulated over the microfacet zenith angle and extracted
/// from the retro-reflection of a measured table.
///
/// Nodes sit at `θk = (π/2)(k / (n - 1))²`. Between nodes `D` is linear in
/// `x = sin²θ`. Since `cos θ dω = dφ dx / 2`, the sampling density `D cos θ`
/// is then piecewise linear in `x` and inverted exactly.
#[derive(Clone)]
pub struct TabulatedDistribution {
    /// Shadowing assumption used at construction.
    shadowing: ShadowingModel,

    /// NDF over `x = sin²θ`.
    ndf: PiecewiseLinear1D,

    /// Projected areas `σ(θk)` at the nodes.
    sigma: Vec<f64>,

    /// Multiplier applied to `ndf` values. 1 when normalized.
    scale: f64,
}

impl TabulatedDistribution {
    /// Extracts a tabulated NDF from a measured table.
    ///
    /// * `shadowing`      - Shadowing assumption.
    /// * `table`          - The measured table.
    /// * `zenith_samples` - Number of zenith nodes (at least 2).
    /// * `normalize`      - Scale `D` so that `∫ D(m) cos θm dm = 1`. When
    ///                      false `D` keeps the scale of the measured data and
    ///                      `pdf` is only proportional to the sampling density.
    pub fn new(
        shadowing: ShadowingModel,
        table: &MerlTable,
        zenith_samples: usize,
        normalize: bool,
    ) -> Result<Self, FitError> {
        let degenerate = || FitError::DegenerateDistribution {
            name: table.name.clone(),
        };
        if zenith_samples < 2 {
            return Err(degenerate());
        }

        let n = zenith_samples;
        let theta: Vec<f64> = (0..n)
            .map(|k| {
                let u = k as f64 / (n - 1) as f64;
                FRAC_PI_2 * u * u
            })
            .collect();
        let x: Vec<f64> = theta
            .iter()
            .map(|t| {
                let s = t.sin();
                s * s
            })
            .collect();

        // Channel-averaged retro-reflection at the nodes.
        let fr: Vec<f64> = theta
            .iter()
            .map(|t| {
                let rgb = table.retro_reflection(*t);
                max((rgb[0] + rgb[1] + rgb[2]) / 3.0, 0.0)
            })
            .collect();

        // With no shadowing fr(θ) ∝ D(θ) / cos²θ.
        let mut d: Vec<f64> = fr
            .iter()
            .zip(theta.iter())
            .map(|(f, t)| f * t.cos() * t.cos())
            .collect();
        let mut raw_integral = normalize_in_place(&x, &mut d).ok_or_else(degenerate)?;

        match shadowing {
            ShadowingModel::Smith => {
                // fr ∝ D G1² / cos²θ = D / σ², so iterate D <- fr σ(D)².
                for _ in 0..SHADOWING_ITERATIONS {
                    let sigma = projected_areas(&theta, &x, &d);
                    d = fr
                        .iter()
                        .zip(sigma.iter())
                        .map(|(f, s)| f * s * s)
                        .collect();
                    raw_integral = normalize_in_place(&x, &mut d).ok_or_else(degenerate)?;
                }
            }
        }

        let peak = d.iter().fold(0.0_f64, |m, v| max(m, *v));
        for v in d.iter_mut() {
            *v = max(*v, SUPPORT_FLOOR * peak);
        }
        normalize_in_place(&x, &mut d).ok_or_else(degenerate)?;

        let sigma = projected_areas(&theta, &x, &d);
        let scale = if normalize { 1.0 } else { raw_integral };

        debug!(
            "Built {:?} NDF for '{}' with {} zenith samples (D(0) = {})",
            shadowing, table.name, n, d[0]
        );

        Ok(Self {
            shadowing,
            ndf: PiecewiseLinear1D::new(x, d),
            sigma,
            scale,
        })
    }

    /// Extracts the default distribution: Smith shadowing, 90 zenith
    /// samples, normalized.
    ///
    /// * `table` - The measured table.
    pub fn smith(table: &MerlTable) -> Result<Self, FitError> {
        Self::new(ShadowingModel::Smith, table, DEFAULT_ZENITH_SAMPLES, true)
    }

    /// Returns the shadowing assumption.
    pub fn shadowing(&self) -> ShadowingModel {
        self.shadowing
    }

    /// Returns the number of zenith nodes.
    pub fn zenith_samples(&self) -> usize {
        self.ndf.count()
    }

    /// Evaluates the NDF for a microfacet normal given its cosine with the
    /// shading normal.
    ///
    /// * `cos_theta` - cos θm.
    pub fn ndf(&self, cos_theta: f64) -> f64 {
        if !(cos_theta > 0.0) {
            return 0.0;
        }
        let x = clamp(1.0 - cos_theta * cos_theta, 0.0, 1.0);
        self.scale * self.ndf.eval(x)
    }

    /// Returns the projected microfacet area seen from a direction with the
    /// given cosine, interpolated between nodes.
    ///
    /// * `cos_theta` - cos θ of the viewing direction.
    pub fn projected_area(&self, cos_theta: f64) -> f64 {
        let c = clamp(cos_theta.abs(), 0.0, 1.0);
        let x = 1.0 - c * c;
        let nodes = &self.ndf.nodes;
        let i = self.ndf.segment(x);
        let t = clamp((x - nodes[i]) / (nodes[i + 1] - nodes[i]), 0.0, 1.0);
        (1.0 - t) * self.sigma[i] + t * self.sigma[i + 1]
    }
}

impl MicrofacetDistribution for TabulatedDistribution {
    fn samples_visible_area(&self) -> bool {
        false
    }

    fn d(&self, wh: &Vector3f) -> Float {
        self.ndf(wh.z as f64) as Float
    }

    fn lambda(&self, w: &Vector3f) -> Float {
        let c = abs_cos_theta(w) as f64;
        if c == 0.0 {
            return INFINITY;
        }
        max(self.projected_area(c) / c - 1.0, 0.0) as Float
    }

    /// Draws `wh` with density `D(wh) cos θh`; the viewing direction is not
    /// used.
    fn sample_wh(&self, _w: &Vector3f, u: &Point2f) -> Vector3f {
        let (x, _, _) = self.ndf.sample_continuous(u.x as f64);
        let sin_theta = x.sqrt();
        let cos_theta = max(1.0 - x, 0.0).sqrt();
        let phi = 2.0 * PI_F64 * u.y as f64;
        Vector3f::from(spherical_direction(sin_theta, cos_theta, phi))
    }
}

impl fmt::Display for TabulatedDistribution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TabulatedDistribution {{ shadowing: {:?}, zenith_samples: {} }}",
            self.shadowing,
            self.zenith_samples()
        )
    }
}

/// Scales `d` so that `π ∫ D dx = 1` and returns the integral before scaling,
/// or `None` if it is not positive and finite.
fn normalize_in_place(x: &[f64], d: &mut [f64]) -> Option<f64> {
    let integral: f64 = (0..x.len() - 1)
        .map(|i| PI_F64 * 0.5 * (x[i + 1] - x[i]) * (d[i] + d[i + 1]))
        .sum();
    if !(integral > 0.0 && integral.is_finite()) {
        return None;
    }
    for v in d.iter_mut() {
        *v /= integral;
    }
    Some(integral)
}

/// Average over φ of `max(0, a + b cos φ)` for `b ≥ 0`.
fn clamped_cosine_average(a: f64, b: f64) -> f64 {
    if b <= 0.0 || a >= b {
        max(a, 0.0)
    } else if a <= -b {
        0.0
    } else {
        let phi0 = (-a / b).acos();
        (a * phi0 + b * phi0.sin()) / PI_F64
    }
}

/// Returns `σ(θk) = ∫ max(0, m·ωk) D(m) dm` for each node direction.
fn projected_areas(theta: &[f64], x: &[f64], d: &[f64]) -> Vec<f64> {
    // Quadrature bands: (cos θm, sin θm, D(θm) * band solid angle).
    let mut bands = Vec::with_capacity((theta.len() - 1) * BAND_SUBDIVISIONS);
    for k in 0..theta.len() - 1 {
        let dt = (theta[k + 1] - theta[k]) / BAND_SUBDIVISIONS as f64;
        for j in 0..BAND_SUBDIVISIONS {
            let (ta, tb) = (theta[k] + j as f64 * dt, theta[k] + (j + 1) as f64 * dt);
            let tm = 0.5 * (ta + tb);
            let (sin_m, cos_m) = tm.sin_cos();
            let t = clamp((sin_m * sin_m - x[k]) / (x[k + 1] - x[k]), 0.0, 1.0);
            let dm = (1.0 - t) * d[k] + t * d[k + 1];
            let solid_angle = 2.0 * PI_F64 * (ta.cos() - tb.cos());
            bands.push((cos_m, sin_m, dm * solid_angle));
        }
    }

    theta
        .iter()
        .map(|to| {
            let (sin_o, cos_o) = to.sin_cos();
            bands
                .iter()
                .map(|(cos_m, sin_m, w)| {
                    w * clamped_cosine_average(cos_m * cos_o, sin_m * sin_o)
                })
                .sum()
        })
        .collect()
}
