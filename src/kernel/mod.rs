//! Polynomial gridding kernels
//!
//! A [`PolynomialKernel`] bundles the piecewise-polynomial form of an ES kernel
//! with its support width and the matching image-domain correction. Kernels
//! are built from an index into [`KERNEL_DB`](crate::params::KERNEL_DB):
//!
//! ```
//! use gridding_kernel::select_kernel;
//!
//! let kernel = select_kernel(0).unwrap();
//! assert_eq!(kernel.support(), 4);
//! assert_eq!(kernel.degree(), 7);
//! ```

use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::correction::{Correction, CorrectionBuilder, GaussLegendreCorrection};
use crate::errors::{KernelError, Result};
use crate::params::{find_kernel, kernel_params, table_len, KernelParams};
use crate::polynomial::PiecewisePolynomial;
use crate::shape::EsKernel;

/// Coefficients needed beyond the support width for full accuracy across the table
pub const EXTRA_DEGREE: usize = 3;

/// A gridding kernel in piecewise-polynomial form
#[derive(Debug, Clone)]
pub struct PolynomialKernel {
    polynomial: PiecewisePolynomial,
    shape: EsKernel,
    params: Option<KernelParams>,
    correction: Arc<dyn Correction>,
}

impl PolynomialKernel {
    /// Fit `shape` with `support` segments of degree `degree`
    pub fn new(
        support: usize,
        degree: usize,
        shape: EsKernel,
        correction: &dyn CorrectionBuilder,
    ) -> Result<Self> {
        let polynomial = PiecewisePolynomial::fit(shape.as_fn(), support, degree)?;
        let correction = correction.build(support, &shape.as_fn());
        Ok(Self {
            polynomial,
            shape,
            params: None,
            correction,
        })
    }

    /// Support width in grid cells
    pub fn support(&self) -> usize {
        self.polynomial.support()
    }

    /// Polynomial degree of every segment
    pub fn degree(&self) -> usize {
        self.polynomial.degree()
    }

    pub fn polynomial(&self) -> &PiecewisePolynomial {
        &self.polynomial
    }

    pub fn shape(&self) -> &EsKernel {
        &self.shape
    }

    /// Table entry the kernel was built from, if any
    pub fn params(&self) -> Option<&KernelParams> {
        self.params.as_ref()
    }

    pub fn correction(&self) -> &Arc<dyn Correction> {
        &self.correction
    }

    /// Kernel value at `x` in [-1, 1], zero outside
    pub fn eval(&self, x: f64) -> f64 {
        self.polynomial.eval(x)
    }

    /// Values of all `W` taps at local offset `t`
    pub fn eval_taps(&self, t: f64) -> Vec<f64> {
        self.polynomial.eval_taps(t).to_vec()
    }

    /// Correction factor at image coordinate `v`
    pub fn corfunc(&self, v: f64) -> f64 {
        self.correction.corfunc(v)
    }

    pub fn corfunc_many(&self, vs: &[f64]) -> Vec<f64> {
        self.correction.corfunc_many(vs)
    }

    /// Largest deviation from the exact shape at the midpoints of `samples`
    /// equal cells of the support
    ///
    /// The shape drops to zero at `±1` itself, so the edges are not sampled.
    pub fn max_error(&self, samples: usize) -> f64 {
        let samples = samples.max(1);
        (0..samples)
            .map(|k| {
                let x = -1.0 + (2 * k + 1) as f64 / samples as f64;
                (self.eval(x) - self.shape.eval(x)).abs()
            })
            .fold(0.0, f64::max)
    }

    /// Serializable description of the kernel
    pub fn summary(&self, samples: usize) -> KernelSummary {
        KernelSummary {
            params: self.params,
            support: self.support(),
            degree: self.degree(),
            shape: self.shape,
            max_error: self.max_error(samples),
            coefficients: self
                .polynomial
                .coefficients()
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
        }
    }
}

/// Kernel metadata and coefficients, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct KernelSummary {
    pub params: Option<KernelParams>,
    pub support: usize,
    pub degree: usize,
    pub shape: EsKernel,
    pub max_error: f64,
    /// One row per power, highest first; one column per segment
    pub coefficients: Vec<Vec<f64>>,
}

/// Builds kernels from the parameter table
#[derive(Debug, Clone)]
pub struct KernelBuilder {
    extra_degree: usize,
    correction: Arc<dyn CorrectionBuilder>,
}

impl KernelBuilder {
    /// Builder with degree `W + 3` and Gauss-Legendre correction
    pub fn new() -> Self {
        Self {
            extra_degree: EXTRA_DEGREE,
            correction: Arc::new(GaussLegendreCorrection),
        }
    }

    /// Use polynomials of degree `W + extra`
    pub fn with_extra_degree(mut self, extra: usize) -> Self {
        self.extra_degree = extra;
        self
    }

    /// Use a different correction builder
    pub fn with_correction<B: CorrectionBuilder + 'static>(mut self, builder: B) -> Self {
        self.correction = Arc::new(builder);
        self
    }

    pub fn extra_degree(&self) -> usize {
        self.extra_degree
    }

    /// Build the kernel for table entry `index`
    pub fn build(&self, index: usize) -> Result<PolynomialKernel> {
        let params = kernel_params(index).ok_or_else(|| {
            warn!("Kernel index {} requested, table has {} entries", index, table_len());
            KernelError::NoKernelFound {
                index,
                available: table_len(),
            }
        })?;

        let shape = EsKernel::from_params(params);
        let degree = params.degree(self.extra_degree);
        debug!(
            "Building kernel {}: W={}, ofactor={}, degree={}, beta={}, e0={}",
            index, params.w, params.ofactor, degree, shape.beta, shape.e0
        );

        let mut kernel = PolynomialKernel::new(params.w, degree, shape, self.correction.as_ref())?;
        kernel.params = Some(*params);
        Ok(kernel)
    }

    /// Build the kernel tuned for `width` and `ofactor`
    pub fn build_for(&self, width: usize, ofactor: f64) -> Result<PolynomialKernel> {
        let index =
            find_kernel(width, ofactor).ok_or(KernelError::NoKernelForWidth { width, ofactor })?;
        self.build(index)
    }
}

impl Default for KernelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the kernel for table entry `index` with the default settings
///
/// Fails with [`KernelError::NoKernelFound`] when `index` is past the end of
/// the table.
pub fn select_kernel(index: usize) -> Result<PolynomialKernel> {
    KernelBuilder::default().build(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::GlFullCorrection;
    use approx::assert_relative_eq;

    #[derive(Debug)]
    struct UnitCorrection;

    impl Correction for UnitCorrection {
        fn corfunc(&self, _v: f64) -> f64 {
            1.0
        }
    }

    #[derive(Debug)]
    struct UnitCorrectionBuilder;

    impl CorrectionBuilder for UnitCorrectionBuilder {
        fn build(&self, _support: usize, _shape: &dyn Fn(f64) -> f64) -> Arc<dyn Correction> {
            Arc::new(UnitCorrection)
        }
    }

    #[test]
    fn test_first_kernel() {
        let kernel = select_kernel(0).unwrap();
        assert_eq!(kernel.support(), 4);
        assert_eq!(kernel.degree(), 7);
        assert_eq!(kernel.polynomial().len(), 32);
        assert_eq!(kernel.params().unwrap().ofactor, 1.15);
    }

    #[test]
    fn test_index_past_end() {
        let n = table_len();
        assert_eq!(
            select_kernel(n).unwrap_err(),
            KernelError::NoKernelFound {
                index: n,
                available: n
            }
        );
        assert!(select_kernel(usize::MAX).is_err());
        assert!(select_kernel(n - 1).is_ok());
    }

    #[test]
    fn test_extra_degree() {
        let kernel = KernelBuilder::new().with_extra_degree(5).build(0).unwrap();
        assert_eq!(kernel.degree(), 9);
        assert!(kernel.max_error(500) <= select_kernel(0).unwrap().max_error(500));
    }

    #[test]
    fn test_custom_correction() {
        let kernel = KernelBuilder::new()
            .with_correction(UnitCorrectionBuilder)
            .build(3)
            .unwrap();
        assert_eq!(kernel.corfunc(0.3), 1.0);
        assert_eq!(kernel.corfunc_many(&[0.0, 0.5]), vec![1.0, 1.0]);
    }

    #[test]
    fn test_default_correction_matches_direct() {
        let kernel = select_kernel(40).unwrap();
        let shape = *kernel.shape();
        let direct = GlFullCorrection::new(kernel.support(), &shape.as_fn());
        for v in [0.0, 0.1, 0.25, 0.4] {
            assert_relative_eq!(kernel.corfunc(v), direct.corfunc(v), max_relative = 1e-15);
        }
    }

    #[test]
    fn test_build_for() {
        let kernel = KernelBuilder::new().build_for(8, 2.0).unwrap();
        assert_eq!(kernel.support(), 8);
        assert_eq!(kernel.degree(), 11);
        assert!(matches!(
            KernelBuilder::new().build_for(8, 1.15),
            Err(KernelError::NoKernelForWidth { width: 8, .. })
        ));
    }

    #[test]
    fn test_eval_taps_sum() {
        let kernel = select_kernel(10).unwrap();
        let taps = kernel.eval_taps(0.0);
        assert_eq!(taps.len(), kernel.support());
        // tap j at local 0 is the kernel at the segment midpoint
        for (segment, &tap) in taps.iter().enumerate() {
            let (l, r) = kernel.polynomial().segment_bounds(segment);
            assert_relative_eq!(tap, kernel.eval(0.5 * (l + r)), max_relative = 1e-14);
        }
    }

    #[test]
    fn test_summary() {
        let summary = select_kernel(0).unwrap().summary(100);
        assert_eq!(summary.coefficients.len(), 8);
        assert!(summary.coefficients.iter().all(|row| row.len() == 4));
        assert!(summary.max_error < 0.01);
    }

    #[test]
    fn test_new_rejects_zero_support() {
        let shape = EsKernel::new(10.0, 0.5);
        assert_eq!(
            PolynomialKernel::new(0, 3, shape, &GaussLegendreCorrection).unwrap_err(),
            KernelError::InvalidSupport(0)
        );
    }
}
