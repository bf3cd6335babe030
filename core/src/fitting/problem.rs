//! Least-squares Problem

use super::{FitSample, ParametricBrdf};
use levenberg_marquardt::LeastSquaresProblem;
use nalgebra::{DMatrix, DVector, Dyn, Matrix, Owned, Vector};
use std::marker::PhantomData;

/// Relative step of the central-difference Jacobian.
const JACOBIAN_STEP: f64 = 1e-6;

/// Cosine-weighted log residuals of a parametric model against table samples.
/// Each sample contributes one residual per colour channel:
/// `ln(1 + w f_model) - ln(1 + w f_measured)` with `w = cos θi cos θo`.
pub struct BrdfFittingProblem<'a, M: ParametricBrdf> {
    /// Dataset name handed to the model.
    name: &'a str,

    /// Fitting targets.
    samples: &'a [FitSample],

    /// Current unconstrained parameters.
    params: DVector<f64>,

    _model: PhantomData<M>,
}

impl<'a, M: ParametricBrdf> BrdfFittingProblem<'a, M> {
    /// Returns a new problem positioned at the given parameters.
    ///
    /// * `name`    - Dataset name.
    /// * `samples` - Fitting targets.
    /// * `initial` - Starting unconstrained parameters.
    pub fn new(name: &'a str, samples: &'a [FitSample], initial: Vec<f64>) -> Self {
        Self {
            name,
            samples,
            params: DVector::from_vec(initial),
            _model: PhantomData,
        }
    }

    /// Returns the current unconstrained parameters.
    pub fn parameters(&self) -> &[f64] {
        self.params.as_slice()
    }

    fn residuals_at(&self, q: &[f64]) -> DVector<f64> {
        let model = M::from_unconstrained(self.name, q);
        let mut r = DVector::zeros(3 * self.samples.len());
        for (i, s) in self.samples.iter().enumerate() {
            let f = model.eval(&s.wo, &s.wi);
            for c in 0..3 {
                r[3 * i + c] = (s.weight * f[c]).ln_1p() - s.target[c];
            }
        }
        r
    }
}

impl<'a, M: ParametricBrdf> LeastSquaresProblem<f64, Dyn, Dyn> for BrdfFittingProblem<'a, M> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, x: &Vector<f64, Dyn, Self::ParameterStorage>) {
        self.params.copy_from(x);
    }

    fn params(&self) -> Vector<f64, Dyn, Self::ParameterStorage> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<Vector<f64, Dyn, Self::ResidualStorage>> {
        Some(self.residuals_at(self.params.as_slice()))
    }

    fn jacobian(&self) -> Option<Matrix<f64, Dyn, Dyn, Self::JacobianStorage>> {
        let n = self.params.len();
        let mut jacobian = DMatrix::zeros(3 * self.samples.len(), n);
        let mut q = self.params.as_slice().to_vec();
        for j in 0..n {
            let x = q[j];
            let h = JACOBIAN_STEP * x.abs().max(1.0);

            q[j] = x + h;
            let forward = self.residuals_at(&q);
            q[j] = x - h;
            let backward = self.residuals_at(&q);
            q[j] = x;

            jacobian.set_column(j, &((forward - backward) / (2.0 * h)));
        }
        Some(jacobian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::*;
    use crate::testing::*;
    use float_cmp::*;

    #[test]
    fn residuals_vanish_at_generating_parameters() {
        let samples = collect_samples(&ABC_TABLE, &FitOptions::coarse());
        let q = reference_abc().unconstrained();
        let problem = BrdfFittingProblem::<AbcBrdf>::new("abc", &samples, q);
        let r = problem.residuals().unwrap();
        assert_eq!(r.len(), 3 * samples.len());
        // The table stores f64 samples so only rounding remains.
        assert!(r.amax() < 1e-9, "max residual {}", r.amax());
    }

    #[test]
    fn jacobian_matches_residual_change() {
        let samples = collect_samples(&SGD_TABLE, &FitOptions::coarse());
        let q = SgdBrdf::initial_parameters(&SGD_TABLE);
        let problem = BrdfFittingProblem::<SgdBrdf>::new("sgd", &samples, q.clone());
        let jacobian = problem.jacobian().unwrap();
        assert_eq!(jacobian.ncols(), q.len());

        // First-order prediction along a small step in the roughness.
        let mut q1 = q.clone();
        let j = 6;
        q1[j] += 1e-4;
        let predicted = problem.residuals().unwrap() + jacobian.column(j) * 1e-4;
        let actual = problem.residuals_at(&q1);
        let error = (predicted - actual).amax();
        assert!(approx_eq!(f64, error, 0.0, epsilon = 1e-6), "error {error}");
    }
}
