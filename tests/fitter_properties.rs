//! Properties of the Chebyshev segment fitter
//!
//! These tests check interpolation at the Chebyshev nodes, exact reproduction
//! of low-degree polynomials and the mirror symmetry of fits of even functions.

use approx::assert_abs_diff_eq;
use gridding_kernel::chebyshev::chebyshev_nodes;
use gridding_kernel::{esknew, fit_piecewise, PiecewisePolynomial};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn steep_kernel(v: f64) -> f64 {
    esknew(v, 2.2 * 16.0, 0.505)
}

fn wide_kernel(v: f64) -> f64 {
    esknew(v, 1.4 * 4.0, 0.54)
}

fn smooth(v: f64) -> f64 {
    (3.0 * v).cos() + 0.5 * v * v
}

#[rstest]
#[case(1, 0)]
#[case(1, 5)]
#[case(2, 3)]
#[case(3, 4)]
#[case(4, 7)]
#[case(7, 10)]
#[case(8, 11)]
#[case(12, 15)]
#[case(16, 19)]
fn test_reproduces_samples_at_nodes(#[case] w: usize, #[case] d: usize) {
    let nodes = chebyshev_nodes(d + 1);
    for f in [steep_kernel as fn(f64) -> f64, wide_kernel, smooth] {
        let poly = fit_piecewise(f, w, d);
        assert_eq!(poly.support(), w);
        assert_eq!(poly.degree(), d);
        assert_eq!(poly.len(), w * (d + 1));

        for segment in 0..w {
            let (l, r) = poly.segment_bounds(segment);
            for &t in &nodes {
                let x = t * 0.5 * (r - l) + 0.5 * (r + l);
                let expected = f(x);
                let tolerance = 1e-12 * expected.abs().max(1.0);
                assert_abs_diff_eq!(poly.eval_segment(segment, t), expected, epsilon = tolerance);
            }
        }
    }
}

#[rstest]
#[case(1, 0)]
#[case(1, 3)]
#[case(3, 4)]
#[case(5, 6)]
#[case(8, 8)]
#[case(16, 8)]
fn test_polynomials_are_exact(#[case] w: usize, #[case] d: usize) {
    let mut rng = StdRng::seed_from_u64(0x6b65726e);
    for degree in 0..=d {
        let coeffs: Vec<f64> = (0..=degree).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let f = |x: f64| coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c);
        let poly = fit_piecewise(f, w, d);

        for _ in 0..200 {
            let x = rng.gen_range(-1.0..=1.0);
            assert_abs_diff_eq!(poly.eval(x), f(x), epsilon = 1e-13);
        }
    }
}

#[rstest]
#[case(1, 5)]
#[case(2, 3)]
#[case(3, 4)]
#[case(4, 7)]
#[case(5, 6)]
fn test_mirror_coefficients(#[case] w: usize, #[case] d: usize) {
    // p_{W-1-i}(t) = p_i(-t), so the t^k coefficients differ by (-1)^k
    for f in [steep_kernel as fn(f64) -> f64, wide_kernel] {
        let poly = fit_piecewise(f, w, d);
        for segment in 0..w {
            let mirror = w - 1 - segment;
            for row in 0..=d {
                let sign = if (d - row) % 2 == 0 { 1.0 } else { -1.0 };
                assert_abs_diff_eq!(
                    poly.coefficient(row, mirror),
                    sign * poly.coefficient(row, segment),
                    epsilon = 1e-12
                );
            }
        }
    }
}

#[rstest]
#[case(4, 7)]
#[case(8, 11)]
#[case(12, 15)]
#[case(16, 19)]
fn test_mirror_values(#[case] w: usize, #[case] d: usize) {
    let poly = fit_piecewise(steep_kernel, w, d);
    for segment in 0..w {
        for k in -50..=50 {
            let t = k as f64 / 50.0;
            assert_abs_diff_eq!(
                poly.eval_segment(w - 1 - segment, t),
                poly.eval_segment(segment, -t),
                epsilon = 1e-13
            );
        }
    }
}

#[test]
fn test_checked_fit_matches_unchecked() {
    let checked = PiecewisePolynomial::fit(smooth, 5, 6).unwrap();
    assert_eq!(checked, fit_piecewise(smooth, 5, 6));
}

#[test]
fn test_storage_order() {
    let poly = fit_piecewise(wide_kernel, 4, 3);
    let flat = poly.to_flat_vec();
    for row in 0..4 {
        for segment in 0..4 {
            assert_eq!(flat[row * 4 + segment], poly.coefficient(row, segment));
        }
    }
}
