//! Chebyshev interpolation of kernel shapes on equal-width segments
//!
//! The support [-1, 1] is split into `W` equal segments. On each segment the
//! target function is sampled at the `D + 1` Chebyshev nodes, the samples are
//! turned into Chebyshev coefficients with a discrete cosine sum, and those are
//! converted to ordinary power-basis coefficients in the segment's local
//! variable `t` in [-1, 1]. Interpolating at Chebyshev nodes keeps the error
//! close to the best uniform approximation of the same degree.

use log::trace;
use ndarray::{aview1, Array2};
use std::f64::consts::PI;

use crate::polynomial::PiecewisePolynomial;

/// Chebyshev series in the first-kind basis
///
/// This struct stores coefficients ordered from lowest to highest degree,
/// `[c₀, c₁, ..., cₙ]`, for `f(t) = c₀·T₀(t) + c₁·T₁(t) + ... + cₙ·Tₙ(t)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevSeries {
    coefficients: Vec<f64>,
}

impl ChebyshevSeries {
    /// Create a new series with the given coefficients
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Interpolate samples taken at [`chebyshev_nodes`] of the same length
    ///
    /// Uses the orthogonal cosine sum over the nodes,
    /// `c_j = 2/n · Σ_k y_k · cos(j(2k+1)π / 2n)`, with `c₀` halved.
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        let scale = 2.0 / n as f64;
        let mut coefficients: Vec<f64> = (0..n)
            .map(|j| {
                samples
                    .iter()
                    .enumerate()
                    .map(|(k, y)| {
                        scale * y * ((j * (2 * k + 1)) as f64 * PI / (2 * n) as f64).cos()
                    })
                    .sum::<f64>()
            })
            .collect();
        if let Some(c0) = coefficients.first_mut() {
            *c0 *= 0.5;
        }
        Self { coefficients }
    }

    /// Evaluate the series at `t` with Clenshaw's recurrence
    pub fn evaluate(&self, t: f64) -> f64 {
        let (first, rest) = match self.coefficients.split_first() {
            Some(split) => split,
            None => return 0.0,
        };

        let mut b1 = 0.0;
        let mut b2 = 0.0;
        for &c in rest.iter().rev() {
            let b0 = c + 2.0 * t * b1 - b2;
            b2 = b1;
            b1 = b0;
        }
        first + t * b1 - b2
    }

    /// Power-basis coefficients of the series, lowest degree first
    pub fn to_monomial(&self) -> Vec<f64> {
        self.to_monomial_with(&chebyshev_power_matrix(self.coefficients.len()))
    }

    /// Same as [`to_monomial`](Self::to_monomial) with a precomputed matrix
    ///
    /// `matrix` must come from [`chebyshev_power_matrix`] with `n` equal to the
    /// number of coefficients.
    pub fn to_monomial_with(&self, matrix: &Array2<f64>) -> Vec<f64> {
        matrix.t().dot(&aview1(&self.coefficients)).to_vec()
    }

    /// Get the degree of the series
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Get a reference to the coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// The `n` Chebyshev nodes `cos((2i+1)π / 2n)` in [-1, 1], descending
pub fn chebyshev_nodes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| ((2 * i + 1) as f64 * PI / (2 * n) as f64).cos())
        .collect()
}

/// Power-basis expansions of `T₀ … T_{n-1}`
///
/// Row `j` holds the coefficients of `T_j`, lowest power first, built from
/// `T₀ = 1`, `T₁ = x` and `T_j = 2x·T_{j-1} − T_{j-2}`.
pub fn chebyshev_power_matrix(n: usize) -> Array2<f64> {
    let mut c = Array2::<f64>::zeros((n, n));
    if n == 0 {
        return c;
    }
    c[[0, 0]] = 1.0;
    if n > 1 {
        c[[1, 1]] = 1.0;
    }
    for j in 2..n {
        c[[j, 0]] = -c[[j - 2, 0]];
        for k in 1..=j {
            c[[j, k]] = 2.0 * c[[j - 1, k - 1]] - c[[j - 2, k]];
        }
    }
    c
}

/// Fit `f` with `w` segments of degree-`d` polynomials over [-1, 1]
///
/// Each segment interpolates `f` at its `d + 1` Chebyshev nodes. The sample
/// mean is removed before the cosine sum and added back to the constant term
/// afterwards.
///
/// The result stores the coefficient of `t^(d-j)` for segment `i` at row `j`,
/// column `i`. `w` must be at least 1; use [`PiecewisePolynomial::fit`] for
/// a checked entry point.
pub fn fit_piecewise<F>(f: F, w: usize, d: usize) -> PiecewisePolynomial
where
    F: Fn(f64) -> f64,
{
    let n = d + 1;
    let nodes = chebyshev_nodes(n);
    let power = chebyshev_power_matrix(n);
    let mut coefficients = Array2::<f64>::zeros((n, w));
    let mut samples = vec![0.0; n];

    for i in 0..w {
        let l = -1.0 + 2.0 * i as f64 / w as f64;
        let r = -1.0 + 2.0 * (i + 1) as f64 / w as f64;
        let half = 0.5 * (r - l);
        let mid = 0.5 * (r + l);

        for (y, &t) in samples.iter_mut().zip(&nodes) {
            *y = f(t * half + mid);
        }
        let avg = samples.iter().sum::<f64>() / n as f64;
        samples.iter_mut().for_each(|y| *y -= avg);

        let mut monomial = ChebyshevSeries::from_samples(&samples).to_monomial_with(&power);
        monomial[0] += avg;

        for (j, &m) in monomial.iter().rev().enumerate() {
            coefficients[[j, i]] = m;
        }
        trace!("segment {} of {}: [{}, {}], mean {}", i, w, l, r, avg);
    }

    PiecewisePolynomial::from_coefficients(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_series_constant() {
        let series = ChebyshevSeries::new(vec![5.0]);
        assert_eq!(series.evaluate(-1.0), 5.0);
        assert_eq!(series.evaluate(0.0), 5.0);
        assert_eq!(series.evaluate(1.0), 5.0);
        assert_eq!(series.degree(), 0);
    }

    #[test]
    fn test_series_quadratic() {
        // 3·T0 + 2·T1 + T2 = 2 + 2x + 2x²
        let series = ChebyshevSeries::new(vec![3.0, 2.0, 1.0]);
        assert_eq!(series.evaluate(-1.0), 2.0);
        assert_eq!(series.evaluate(0.0), 2.0);
        assert_eq!(series.evaluate(1.0), 6.0);
        assert_eq!(series.to_monomial(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_series() {
        let series = ChebyshevSeries::new(Vec::new());
        assert_eq!(series.evaluate(0.3), 0.0);
        assert_eq!(series.degree(), 0);
    }

    #[test]
    fn test_power_matrix() {
        let c = chebyshev_power_matrix(5);
        assert_eq!(c.row(0).to_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(c.row(1).to_vec(), vec![0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(c.row(2).to_vec(), vec![-1.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(c.row(3).to_vec(), vec![0.0, -3.0, 0.0, 4.0, 0.0]);
        assert_eq!(c.row(4).to_vec(), vec![1.0, 0.0, -8.0, 0.0, 8.0]);
    }

    #[test]
    fn test_power_matrix_small() {
        assert_eq!(chebyshev_power_matrix(0).len(), 0);
        assert_eq!(chebyshev_power_matrix(1)[[0, 0]], 1.0);
    }

    #[test]
    fn test_nodes() {
        let nodes = chebyshev_nodes(6);
        assert_eq!(nodes.len(), 6);
        for pair in nodes.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        for i in 0..3 {
            assert_abs_diff_eq!(nodes[i], -nodes[5 - i], epsilon = 1e-15);
        }
        // roots of T6
        for &x in &nodes {
            assert_abs_diff_eq!((6.0 * x.acos()).cos(), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_series_interpolates_samples() {
        let nodes = chebyshev_nodes(9);
        let samples: Vec<f64> = nodes.iter().map(|&t| (2.0 * t).sin() + t * t).collect();
        let series = ChebyshevSeries::from_samples(&samples);
        for (&t, &y) in nodes.iter().zip(&samples) {
            assert_abs_diff_eq!(series.evaluate(t), y, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_monomial_matches_series() {
        let series = ChebyshevSeries::new(vec![0.3, -1.2, 0.7, 0.05, -0.4, 0.11]);
        let monomial = series.to_monomial();
        for i in 0..=20 {
            let t = -1.0 + i as f64 * 0.1;
            let horner = monomial.iter().rev().fold(0.0, |acc, &c| acc * t + c);
            assert_abs_diff_eq!(horner, series.evaluate(t), epsilon = 1e-13);
        }
    }

    #[test]
    fn test_fit_layout() {
        let poly = fit_piecewise(|x| x, 3, 2);
        assert_eq!(poly.support(), 3);
        assert_eq!(poly.degree(), 2);
        // f(x) = x on segment i is t/3 + mid_i, so t² vanishes everywhere
        for i in 0..3 {
            let mid = -1.0 + (2 * i + 1) as f64 / 3.0;
            assert_abs_diff_eq!(poly.coefficient(0, i), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(poly.coefficient(1, i), 1.0 / 3.0, epsilon = 1e-14);
            assert_abs_diff_eq!(poly.coefficient(2, i), mid, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_fit_degree_zero() {
        let poly = fit_piecewise(|_| 2.5, 4, 0);
        assert_eq!(poly.len(), 4);
        for i in 0..4 {
            assert_eq!(poly.coefficient(0, i), 2.5);
        }
    }
}
