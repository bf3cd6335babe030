//! Piecewise-linear 1D Distribution.

use super::*;

/// Represents a piecewise-linear 1D function over non-uniformly spaced nodes
/// and provides exact inversion sampling of its normalized density. The
/// density of a returned sample equals `eval(x) / integral` without
/// approximation.
#[derive(Clone, Debug)]
pub struct PiecewiseLinear1D {
    /// Node positions in increasing order.
    pub nodes: Vec<f64>,

    /// Non-negative function values at the nodes.
    pub values: Vec<f64>,

    /// CDF at the nodes (`cdf[0] = 0`, `cdf[n - 1] = 1`).
    pub cdf: Vec<f64>,

    /// Integral of the function over the node range.
    pub integral: f64,
}

impl PiecewiseLinear1D {
    /// Returns a new `PiecewiseLinear1D`.
    ///
    /// * `nodes`  - At least two node positions in increasing order.
    /// * `values` - Function values at the nodes; negative values are clamped
    ///              to zero.
    pub fn new(nodes: Vec<f64>, values: Vec<f64>) -> Self {
        assert!(nodes.len() >= 2, "Need at least two nodes");
        assert_eq!(nodes.len(), values.len());
        debug_assert!(nodes.windows(2).all(|w| w[0] < w[1]));

        let values: Vec<f64> = values.into_iter().map(|v| max(v, 0.0)).collect();

        // Trapezoid integral of each segment is exact for a linear function.
        let n = nodes.len();
        let mut cdf = Vec::with_capacity(n);
        cdf.push(0.0);
        for i in 0..n - 1 {
            let area = 0.5 * (nodes[i + 1] - nodes[i]) * (values[i] + values[i + 1]);
            cdf.push(cdf[i] + area);
        }

        let integral = cdf[n - 1];
        if integral > 0.0 {
            for v in cdf.iter_mut().skip(1) {
                *v /= integral;
            }
        } else {
            let range = nodes[n - 1] - nodes[0];
            for (v, x) in cdf.iter_mut().zip(nodes.iter()) {
                *v = (x - nodes[0]) / range;
            }
        }
        cdf[n - 1] = 1.0;

        Self {
            nodes,
            values,
            cdf,
            integral,
        }
    }

    /// Returns the number of nodes.
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the segment containing `x` (clamped to the node range).
    ///
    /// * `x` - The position.
    pub fn segment(&self, x: f64) -> usize {
        find_interval(self.count(), |i| self.nodes[i] <= x)
    }

    /// Evaluates the function. Returns 0 outside the node range.
    ///
    /// * `x` - The position.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.count();
        if !(x >= self.nodes[0] && x <= self.nodes[n - 1]) {
            return 0.0;
        }

        let i = self.segment(x);
        let (x0, x1) = (self.nodes[i], self.nodes[i + 1]);
        let t = clamp((x - x0) / (x1 - x0), 0.0, 1.0);
        (1.0 - t) * self.values[i] + t * self.values[i + 1]
    }

    /// Returns the normalized density at `x`.
    ///
    /// * `x` - The position.
    pub fn pdf(&self, x: f64) -> f64 {
        if self.integral > 0.0 {
            self.eval(x) / self.integral
        } else {
            0.0
        }
    }

    /// Return a sample, its PDF and the segment offset from the distribution
    /// given a random sample.
    ///
    /// * `u` - The random sample in [0, 1).
    pub fn sample_continuous(&self, u: f64) -> (f64, f64, usize) {
        let u = clamp(u, 0.0, 1.0);

        // Find surrounding CDF segments and `offset`.
        let offset = find_interval(self.cdf.len(), |i| self.cdf[i] <= u);

        // Remap `u` to the segment.
        let du = self.cdf[offset + 1] - self.cdf[offset];
        let r = if du > 0.0 {
            clamp((u - self.cdf[offset]) / du, 0.0, 1.0)
        } else {
            0.0
        };

        // Invert the segment's linear density a + (b - a)t. The rationalized
        // root stays stable when a ≈ b.
        let (a, b) = (self.values[offset], self.values[offset + 1]);
        let t = if a + b > 0.0 {
            let disc = max(a * a + r * (b * b - a * a), 0.0);
            clamp(r * (a + b) / (a + disc.sqrt()), 0.0, 1.0)
        } else {
            r
        };

        let (x0, x1) = (self.nodes[offset], self.nodes[offset + 1]);
        let x = x0 + t * (x1 - x0);
        (x, self.pdf(x), offset)
    }
}
