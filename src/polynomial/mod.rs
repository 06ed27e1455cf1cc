//! Piecewise polynomials on equal-width segments of [-1, 1]
//!
//! Coefficients are kept degree-major: row `j` of the matrix holds the
//! coefficient of `t^(D-j)` for every segment, so the coefficients of one power
//! are contiguous across segments. Gridding code evaluates all `W` taps of a
//! kernel at the same local offset, and this layout lets that loop run over
//! whole rows.

use ndarray::{Array1, Array2};

use crate::chebyshev::fit_piecewise;
use crate::errors::{KernelError, Result};

/// Per-segment polynomial representation of a function on [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomial {
    /// Coefficient matrix: [degree index][segment index], highest power first
    coefficients: Array2<f64>,
}

impl PiecewisePolynomial {
    /// Fit `f` with `w` segments of degree `d`, rejecting `w == 0`
    pub fn fit<F>(f: F, w: usize, d: usize) -> Result<Self>
    where
        F: Fn(f64) -> f64,
    {
        if w == 0 {
            return Err(KernelError::InvalidSupport(w));
        }
        Ok(fit_piecewise(f, w, d))
    }

    /// Wrap an existing `(D + 1) × W` coefficient matrix
    ///
    /// The matrix must have at least one row.
    pub fn from_coefficients(coefficients: Array2<f64>) -> Self {
        Self { coefficients }
    }

    /// Number of segments
    pub fn support(&self) -> usize {
        self.coefficients.ncols()
    }

    /// Polynomial degree of every segment
    pub fn degree(&self) -> usize {
        self.coefficients.nrows().saturating_sub(1)
    }

    /// Total number of stored coefficients, `W · (D + 1)`
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The coefficient matrix
    pub fn coefficients(&self) -> &Array2<f64> {
        &self.coefficients
    }

    /// Coefficients flattened in storage order (degree-major, segment-minor)
    pub fn to_flat_vec(&self) -> Vec<f64> {
        self.coefficients.iter().copied().collect()
    }

    /// Coefficient at row `degree_index` (power `D - degree_index`) of `segment`
    pub fn coefficient(&self, degree_index: usize, segment: usize) -> f64 {
        self.coefficients[[degree_index, segment]]
    }

    /// Coefficients of one segment, highest power first
    pub fn segment_coefficients(&self, segment: usize) -> Vec<f64> {
        self.coefficients.column(segment).to_vec()
    }

    /// Interval `[l, r]` covered by `segment`
    pub fn segment_bounds(&self, segment: usize) -> (f64, f64) {
        let w = self.support() as f64;
        (
            -1.0 + 2.0 * segment as f64 / w,
            -1.0 + 2.0 * (segment + 1) as f64 / w,
        )
    }

    /// Split `x` into a segment index and the local coordinate in [-1, 1]
    ///
    /// Returns `None` outside [-1, 1]. The right end belongs to the last segment.
    pub fn locate(&self, x: f64) -> Option<(usize, f64)> {
        let w = self.support();
        if w == 0 || !(-1.0..=1.0).contains(&x) {
            return None;
        }
        let scaled = (x + 1.0) * w as f64;
        let segment = ((0.5 * scaled) as usize).min(w - 1);
        Some((segment, scaled - (2 * segment + 1) as f64))
    }

    /// Evaluate `segment` at local coordinate `t` with Horner's rule
    pub fn eval_segment(&self, segment: usize, t: f64) -> f64 {
        self.coefficients
            .column(segment)
            .iter()
            .fold(0.0, |acc, &c| acc * t + c)
    }

    /// Evaluate at `x` in [-1, 1]; zero outside the support
    pub fn eval(&self, x: f64) -> f64 {
        match self.locate(x) {
            Some((segment, t)) => self.eval_segment(segment, t),
            None => 0.0,
        }
    }

    /// Evaluate at multiple points
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// Evaluate every segment at the same local coordinate `t`
    ///
    /// Works row by row over the coefficient matrix, one power at a time.
    pub fn eval_taps(&self, t: f64) -> Array1<f64> {
        let mut rows = self.coefficients.rows().into_iter();
        let mut result = match rows.next() {
            Some(first) => first.to_owned(),
            None => return Array1::zeros(self.support()),
        };
        for row in rows {
            result.mapv_inplace(|v| v * t);
            result += &row;
        }
        result
    }
}
