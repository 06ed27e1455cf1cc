//! Image-domain correction for kernel roll-off
//!
//! Gridding with a kernel multiplies the image by the kernel's Fourier
//! transform. The correction undoes that: for a kernel `phi` of support `W`
//! grid cells it is
//!
//! ```text
//! c(v) = 1 / (W/2 · ∫ phi(x) cos(π W v x) dx),   x in [-1, 1]
//! ```
//!
//! where `v` is the image coordinate in units of the oversampled grid
//! (|v| <= 1/2). The integral is evaluated with Gauss-Legendre quadrature
//! over the positive half of the support, since the kernel is even.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Newton iterations allowed per Legendre root
const MAX_NEWTON_STEPS: usize = 100;

/// A correction function usable by the kernel evaluator
pub trait Correction: fmt::Debug + Send + Sync {
    /// Correction factor at image coordinate `v`
    fn corfunc(&self, v: f64) -> f64;

    /// Correction factors at multiple coordinates
    fn corfunc_many(&self, vs: &[f64]) -> Vec<f64> {
        vs.iter().map(|&v| self.corfunc(v)).collect()
    }
}

/// Builds the correction for a kernel shape
pub trait CorrectionBuilder: fmt::Debug + Send + Sync {
    fn build(&self, support: usize, shape: &dyn Fn(f64) -> f64) -> Arc<dyn Correction>;
}

/// Gauss-Legendre quadrature rule on [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    /// Nodes in ascending order
    nodes: Vec<f64>,
    /// Weights matching `nodes`
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Rule with `n` nodes, exact for polynomials up to degree `2n - 1`
    pub fn new(n: usize) -> Self {
        // roots with x >= 0, largest first
        let half: Vec<(f64, f64)> = (0..(n + 1) / 2).map(|i| legendre_root(n, i)).collect();

        let mut nodes = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);
        for &(x, w) in &half {
            nodes.push(-x);
            weights.push(w);
        }
        // odd n: the middle root is already in place
        for &(x, w) in half.iter().rev().skip(n % 2) {
            nodes.push(x);
            weights.push(w);
        }
        Self { nodes, weights }
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Approximate the integral of `f` over [-1, 1]
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }

    /// Nodes `x >= 0` with weights such that `2 · Σ w f(x)` integrates an even `f`
    ///
    /// A node at zero (odd `n`) keeps half of its weight.
    pub fn symmetric_half(&self) -> (Vec<f64>, Vec<f64>) {
        self.nodes
            .iter()
            .zip(&self.weights)
            .filter(|&(&x, _)| x >= 0.0)
            .map(|(&x, &w)| if x == 0.0 { (x, 0.5 * w) } else { (x, w) })
            .unzip()
    }
}

/// Legendre polynomial `P_n(x)` and its derivative
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 0..n {
        let p3 = p2;
        p2 = p1;
        p1 = ((2 * j + 1) as f64 * x * p2 - j as f64 * p3) / (j + 1) as f64;
    }
    (p1, n as f64 * (x * p1 - p2) / (x * x - 1.0))
}

/// The `i`-th largest root of `P_n` and its quadrature weight
fn legendre_root(n: usize, i: usize) -> (f64, f64) {
    if 2 * i + 1 == n {
        // odd n: P_n(0) = 0 exactly
        let (_, dp) = legendre_with_derivative(n, 0.0);
        return (0.0, 2.0 / (dp * dp));
    }
    let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
    for _ in 0..MAX_NEWTON_STEPS {
        let (p, dp) = legendre_with_derivative(n, x);
        let step = p / dp;
        x -= step;
        if step.abs() <= 1e-15 {
            break;
        }
    }
    let (_, dp) = legendre_with_derivative(n, x);
    (x, 2.0 / ((1.0 - x * x) * dp * dp))
}

/// Correction computed by direct quadrature of the kernel's Fourier integral
#[derive(Debug, Clone)]
pub struct GlFullCorrection {
    support: usize,
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GlFullCorrection {
    /// Tabulate `shape` at the quadrature nodes for a kernel of width `support`
    ///
    /// Uses `2p` nodes with `p = ⌊1.5 W⌋ + 2`, enough for the oscillation of the
    /// cosine over the usable field.
    pub fn new(support: usize, shape: &dyn Fn(f64) -> f64) -> Self {
        let p = (1.5 * support as f64) as usize + 2;
        let (nodes, mut weights) = GaussLegendre::new(2 * p).symmetric_half();
        for (w, &x) in weights.iter_mut().zip(&nodes) {
            *w *= shape(x) * support as f64;
        }
        Self {
            support,
            nodes,
            weights,
        }
    }

    pub fn support(&self) -> usize {
        self.support
    }
}

impl Correction for GlFullCorrection {
    fn corfunc(&self, v: f64) -> f64 {
        let scale = PI * self.support as f64 * v;
        let sum: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * (scale * x).cos())
            .sum();
        1.0 / sum
    }
}

/// Default builder producing a [`GlFullCorrection`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussLegendreCorrection;

impl CorrectionBuilder for GaussLegendreCorrection {
    fn build(&self, support: usize, shape: &dyn Fn(f64) -> f64) -> Arc<dyn Correction> {
        Arc::new(GlFullCorrection::new(support, shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::esknew;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_three_point_rule() {
        let rule = GaussLegendre::new(3);
        let r = (0.6f64).sqrt();
        assert_abs_diff_eq!(rule.nodes()[0], -r, epsilon = 1e-15);
        assert_abs_diff_eq!(rule.nodes()[1], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(rule.nodes()[2], r, epsilon = 1e-15);
        assert_abs_diff_eq!(rule.weights()[0], 5.0 / 9.0, epsilon = 1e-15);
        assert_abs_diff_eq!(rule.weights()[1], 8.0 / 9.0, epsilon = 1e-15);
        assert_abs_diff_eq!(rule.weights()[2], 5.0 / 9.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rule_exactness() {
        for n in 1..12 {
            let rule = GaussLegendre::new(n);
            assert_eq!(rule.nodes().len(), n);
            assert_abs_diff_eq!(rule.weights().iter().sum::<f64>(), 2.0, epsilon = 1e-13);
            let top = 2 * n - 1;
            // ∫ x^k over [-1, 1] for even k
            for k in (0..=top).step_by(2) {
                let exact = 2.0 / (k + 1) as f64;
                assert_abs_diff_eq!(rule.integrate(|x| x.powi(k as i32)), exact, epsilon = 1e-13);
            }
            assert_abs_diff_eq!(rule.integrate(|x| x.powi(top as i32)), 0.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_nodes_ascending() {
        let rule = GaussLegendre::new(10);
        for pair in rule.nodes().windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_symmetric_half() {
        for n in [6, 7] {
            let (nodes, weights) = GaussLegendre::new(n).symmetric_half();
            assert_eq!(nodes.len(), (n + 1) / 2);
            assert!(nodes.iter().all(|&x| x >= 0.0));
            assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_box_kernel_correction() {
        // phi = 1 integrates to 2, so c(0) = 1 / W
        let correction = GlFullCorrection::new(4, &|_: f64| 1.0);
        assert_relative_eq!(correction.corfunc(0.0), 0.25, max_relative = 1e-13);
        assert_eq!(correction.support(), 4);
    }

    #[test]
    fn test_es_correction_shape() {
        let beta = 2.0 * 6.0;
        let shape = move |v: f64| esknew(v, beta, 0.52);
        let correction = GaussLegendreCorrection.build(6, &shape);
        let values = correction.corfunc_many(&[0.0, 0.1, 0.2, 0.3, 0.4, 0.5]);
        for pair in values.windows(2) {
            assert!(pair[0] > 0.0 && pair[0] < pair[1]);
        }
        for v in [0.05, 0.17, 0.33] {
            assert_relative_eq!(correction.corfunc(v), correction.corfunc(-v), max_relative = 1e-14);
        }
    }
}
