//! Fitting of compressed reflectance models to measured tables.

use crate::error::FitError;
use crate::geometry::*;
use crate::pbrt::*;
use crate::reflection::*;
use itertools::iproduct;
use levenberg_marquardt::{LevenbergMarquardt, TerminationReason};
use std::f64::consts::PI as PI_F64;

mod problem;

// Re-exports
pub use problem::*;

/// Options controlling which table bins take part in a fit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FitOptions {
    /// Stride over half-vector zenith bins.
    pub theta_h_stride: usize,

    /// Stride over difference-vector zenith bins.
    pub theta_d_stride: usize,

    /// Stride over difference-vector azimuth bins.
    pub phi_d_stride: usize,

    /// Solver patience; the solver gives up after `patience * (parameters + 1)`
    /// residual evaluations.
    pub patience: usize,
}

impl FitOptions {
    /// Returns options that fit a sparse subset of the table. Much faster and
    /// still enough for the smooth analytic models.
    pub fn coarse() -> Self {
        Self {
            theta_h_stride: 3,
            theta_d_stride: 6,
            phi_d_stride: 15,
            patience: 100,
        }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            theta_h_stride: 1,
            theta_d_stride: 2,
            phi_d_stride: 6,
            patience: 100,
        }
    }
}

/// A compressed model with an unconstrained parameter vector that the solver
/// can move freely.
pub trait ParametricBrdf: CompressedBrdf {
    /// Returns the starting point of the solver estimated from the table.
    ///
    /// * `table` - The measured table.
    fn initial_parameters(table: &MerlTable) -> Vec<f64>;

    /// Builds a model from an unconstrained parameter vector.
    ///
    /// * `name` - Dataset name.
    /// * `q`    - Unconstrained parameters.
    fn from_unconstrained(name: &str, q: &[f64]) -> Self;

    /// Returns true if the natural parameters are finite and in range.
    fn is_valid(&self) -> bool;
}

/// One table bin used as a fitting target.
#[derive(Copy, Clone, Debug)]
pub struct FitSample {
    /// Incident direction at the bin centre.
    pub wi: Vector3d,

    /// Outgoing direction at the bin centre.
    pub wo: Vector3d,

    /// Cosine weight `cos θi cos θo`.
    pub weight: f64,

    /// Target `ln(1 + weight * f)` per channel.
    pub target: [f64; 3],
}

/// Collects the strided valid bins of a table. Bins with missing samples or
/// a direction on or below the horizon are skipped.
///
/// * `table`   - The measured table.
/// * `options` - Fit options.
pub fn collect_samples(table: &MerlTable, options: &FitOptions) -> Vec<FitSample> {
    let grid = iproduct!(
        (0..THETA_H_RES).step_by(max(options.theta_h_stride, 1)),
        (0..THETA_D_RES).step_by(max(options.theta_d_stride, 1)),
        (0..PHI_D_RES).step_by(max(options.phi_d_stride, 1))
    );

    grid.filter_map(|(ih, id, ip)| {
        let rgb = table.sample(ih, id, ip)?;
        let (theta_h, theta_d, phi_d) = bin_center(ih, id, ip);
        let (wi, wo) = HalfDiff {
            theta_h,
            phi_h: 0.0,
            theta_d,
            phi_d,
        }
        .to_directions();
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return None;
        }

        let weight = wi.z * wo.z;
        Some(FitSample {
            wi,
            wo,
            weight,
            target: rgb.map(|v| (weight * v).ln_1p()),
        })
    })
    .collect()
}

/// Fits a parametric model to a table with Levenberg-Marquardt. The result
/// only depends on the table, name and options.
///
/// * `table`   - The measured table.
/// * `name`    - Dataset name given to the model.
/// * `options` - Fit options.
pub fn fit_model<M: ParametricBrdf>(
    table: &MerlTable,
    name: &str,
    options: &FitOptions,
) -> Result<M, FitError> {
    let samples = collect_samples(table, options);
    if samples.is_empty() {
        return Err(FitError::NoSamples {
            name: name.to_string(),
        });
    }

    let problem = BrdfFittingProblem::<M>::new(name, &samples, M::initial_parameters(table));
    let (problem, report) = LevenbergMarquardt::new()
        .with_patience(options.patience)
        .minimize(problem);

    match report.termination {
        TerminationReason::LostPatience => {
            warn!(
                "{} fit of '{}' ran out of patience; keeping the best parameters",
                M::MODEL,
                name
            );
        }
        ref reason if reason.was_successful() => {}
        reason => {
            return Err(FitError::NotConverged {
                name: name.to_string(),
                reason: format!("{:?}", reason),
            })
        }
    }

    let q = problem.parameters();
    if q.iter().any(|v| !v.is_finite()) {
        return Err(FitError::InvalidParameters {
            name: name.to_string(),
        });
    }

    let model = M::from_unconstrained(name, q);
    if !model.is_valid() {
        return Err(FitError::InvalidParameters {
            name: name.to_string(),
        });
    }

    info!(
        "Fitted {} to '{}': {} samples, {} evaluations, objective {:.6e}",
        M::MODEL,
        name,
        samples.len(),
        report.number_of_evaluations,
        report.objective_function
    );
    Ok(model)
}

/// Retro-reflection profile of a table: `(θh, rgb)` at each half-vector
/// zenith bin with the smallest difference angle.
///
/// * `table` - The measured table.
pub fn retro_profile(table: &MerlTable) -> Vec<(f64, [f64; 3])> {
    (0..THETA_H_RES)
        .map(|ih| {
            let (theta_h, _, _) = bin_center(ih, 0, 0);
            (theta_h, table.sample(ih, 0, 0).unwrap_or([0.0; 3]))
        })
        .collect()
}

/// Estimates the diffuse albedo `kd` per channel as `π` times the darkest
/// retro-reflection sample.
///
/// * `profile` - Retro-reflection profile.
pub fn diffuse_estimate(profile: &[(f64, [f64; 3])]) -> [f64; 3] {
    let mut kd = [0.0; 3];
    for (c, k) in kd.iter_mut().enumerate() {
        let darkest = profile
            .iter()
            .map(|(_, rgb)| rgb[c])
            .fold(f64::INFINITY, f64::min);
        *k = max(PI_F64 * darkest, 1e-4);
    }
    kd
}

/// Estimates the zenith angle at which the specular part of the
/// retro-reflection falls to half its peak.
///
/// * `profile` - Retro-reflection profile.
/// * `kd`      - Diffuse albedo estimate.
pub fn half_width_estimate(profile: &[(f64, [f64; 3])], kd: &[f64; 3]) -> f64 {
    let floor = (kd[0] + kd[1] + kd[2]) / (3.0 * PI_F64);
    let specular = |rgb: &[f64; 3]| (rgb[0] + rgb[1] + rgb[2]) / 3.0 - floor;

    let peak = specular(&profile[0].1);
    profile
        .iter()
        .find(|(_, rgb)| specular(rgb) < 0.5 * peak)
        .map_or(0.5, |(theta_h, _)| clamp(*theta_h, 0.01, 1.4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn samples_are_above_horizon() {
        let samples = collect_samples(&ABC_TABLE, &FitOptions::coarse());
        assert!(!samples.is_empty());
        for s in samples.iter() {
            assert!(s.wi.z > 0.0 && s.wo.z > 0.0);
            assert!(s.target.iter().all(|t| t.is_finite() && *t >= 0.0));
        }
    }

    #[test]
    fn stride_controls_sample_count() {
        let coarse = collect_samples(&ABC_TABLE, &FitOptions::coarse()).len();
        let fine = collect_samples(&ABC_TABLE, &FitOptions::default()).len();
        assert!(fine > 10 * coarse);
    }

    #[test]
    fn missing_table_has_no_samples() {
        assert!(collect_samples(&MISSING_TABLE, &FitOptions::coarse()).is_empty());
        assert!(matches!(
            fit_model::<AbcBrdf>(&MISSING_TABLE, "missing", &FitOptions::coarse()),
            Err(FitError::NoSamples { .. })
        ));
    }

    #[test]
    fn half_width_of_synthetic_lobe() {
        let profile = retro_profile(&BECKMANN_TABLE);
        let kd = diffuse_estimate(&profile);
        assert!(kd.iter().all(|k| *k >= 1e-4 && *k < 0.05));
        let theta = half_width_estimate(&profile, &kd);
        // Beckmann with α = 0.25 halves near tan²θ = α² ln 2.
        let expected = (BECKMANN_ALPHA * BECKMANN_ALPHA * 2.0_f64.ln()).sqrt().atan();
        assert!((theta - expected).abs() < 0.1, "{theta} vs {expected}");
    }
}
