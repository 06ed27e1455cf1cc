//! Gridding kernels for non-uniform FFTs
//!
//! This crate builds piecewise-polynomial approximations of the "exponential
//! of semicircle" (ES) window used to spread non-uniform samples onto a
//! regular grid and to interpolate them back.
//!
//! Two pieces do the work:
//!
//! - [`chebyshev`] fits any function on [-1, 1] with `W` equal segments of
//!   degree-`D` polynomials by interpolating at Chebyshev nodes.
//! - [`kernel`] turns an entry of the tuned parameter table in [`params`] into
//!   a ready-to-use [`PolynomialKernel`], including the image-domain
//!   correction from [`correction`].
//!
//! ```
//! use gridding_kernel::{fit_piecewise, KernelBuilder};
//!
//! let kernel = KernelBuilder::new().build_for(6, 2.0).unwrap();
//! assert_eq!(kernel.degree(), 9);
//!
//! let poly = fit_piecewise(|x| 1.0 - x * x, 4, 2);
//! assert!((poly.eval(0.3) - 0.91).abs() < 1e-14);
//! ```

pub mod chebyshev;
pub mod correction;
pub mod errors;
pub mod kernel;
pub mod params;
pub mod polynomial;
pub mod shape;

// Re-export commonly used types
pub use chebyshev::{fit_piecewise, ChebyshevSeries};
pub use correction::{Correction, CorrectionBuilder, GaussLegendreCorrection};
pub use errors::{KernelError, Result};
pub use kernel::{select_kernel, KernelBuilder, PolynomialKernel};
pub use params::{KernelParams, KERNEL_DB};
pub use polynomial::PiecewisePolynomial;
pub use shape::{esknew, EsKernel};
