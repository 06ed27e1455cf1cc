//! Exponential of semicircle ("ES") kernel shape
//!
//! The kernel family used for gridding is
//!
//! ```text
//! phi(v) = exp(beta * ((1 - v^2)^e0 - 1)),   |v| < 1
//! ```
//!
//! and zero on and beyond the support edge. `beta` controls the steepness and
//! `e0` the roll-off profile; tuned values for both live in [`crate::params`].

use num_traits::Float;
use serde::Serialize;

use crate::params::KernelParams;

/// Evaluate the ES kernel at normalized coordinate `v`
///
/// `beta` is the absolute steepness (already scaled by the support width).
/// Points with `(1 - v)(1 + v) <= 0` return exactly zero, so values that round
/// slightly past the edge never produce NaN from the fractional power.
pub fn esknew<T: Float>(v: T, beta: T, e0: T) -> T {
    let t = (T::one() - v) * (T::one() + v);
    if t <= T::zero() {
        return T::zero();
    }
    (beta * (t.powf(e0) - T::one())).exp()
}

/// An ES kernel bound to a fixed steepness and exponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EsKernel {
    /// Absolute steepness
    pub beta: f64,
    /// Shape exponent
    pub e0: f64,
}

impl EsKernel {
    pub fn new(beta: f64, e0: f64) -> Self {
        Self { beta, e0 }
    }

    /// Build the shape for a table entry, scaling its per-width steepness
    pub fn from_params(params: &KernelParams) -> Self {
        Self::new(params.absolute_beta(), params.e0)
    }

    /// Kernel value at `v`
    pub fn eval(&self, v: f64) -> f64 {
        esknew(v, self.beta, self.e0)
    }

    /// Borrow the shape as a plain function, as expected by the fitter
    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |v| self.eval(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BETA: f64 = 2.3 * 7.0;
    const E0: f64 = 0.52;

    #[test]
    fn test_center_is_one() {
        assert_eq!(esknew(0.0, BETA, E0), 1.0);
    }

    #[test]
    fn test_edges_are_zero() {
        assert_eq!(esknew(1.0, BETA, E0), 0.0);
        assert_eq!(esknew(-1.0, BETA, E0), 0.0);
        assert_eq!(esknew(1.0f32, 5.0, 0.5), 0.0);
    }

    #[test]
    fn test_beyond_support() {
        for v in [1.0 + 1e-16, 1.0 + f64::EPSILON, -1.0 - f64::EPSILON, 1.5, -3.0] {
            let value = esknew(v, BETA, E0);
            assert!(!value.is_nan(), "NaN at v={}", v);
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_even() {
        for i in 0..50 {
            let v = i as f64 / 50.0;
            assert_eq!(esknew(v, BETA, E0), esknew(-v, BETA, E0));
        }
    }

    #[test]
    fn test_decreasing_from_center() {
        let mut prev = esknew(0.0, BETA, E0);
        for i in 1..=100 {
            let value = esknew(i as f64 / 100.0, BETA, E0);
            assert!(value < prev);
            prev = value;
        }
    }

    #[test]
    fn test_known_value() {
        let v: f64 = 0.5;
        let expected = (BETA * ((0.75f64).powf(E0) - 1.0)).exp();
        assert_relative_eq!(esknew(v, BETA, E0), expected, max_relative = 1e-15);
    }

    #[test]
    fn test_single_precision_matches() {
        let single = esknew(0.3f32, 10.0, 0.55);
        let double = esknew(0.3f64, 10.0, 0.55);
        assert_relative_eq!(single as f64, double, max_relative = 1e-5);
    }

    #[test]
    fn test_from_params() {
        let params = KernelParams::new(6, 2.0, 6.5649967e-06, 2.12725139744555758, 0.518297358983928147, 2.1605777183);
        let kernel = EsKernel::from_params(&params);
        assert_relative_eq!(kernel.beta, 6.0 * 2.12725139744555758);
        assert_eq!(kernel.e0, params.e0);
        let f = kernel.as_fn();
        assert_eq!(f(0.25), kernel.eval(0.25));
    }
}
