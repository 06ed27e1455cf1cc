//! Error types for kernel construction
//!
//! This module defines the error type returned when a gridding kernel cannot be
//! built from the parameter table.

use thiserror::Error;

/// Main error type for kernel construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// The requested table index is past the end of the parameter table
    #[error("no appropriate kernel found: index {index} is outside the table (size {available})")]
    NoKernelFound {
        /// The index that was requested
        index: usize,
        /// Number of entries in the table
        available: usize,
    },

    /// A piecewise fit was requested with zero segments
    #[error("Invalid support width: {0} (must be at least 1)")]
    InvalidSupport(usize),

    /// No table entry matches the requested support width and oversampling factor
    #[error("No kernel with support width {width} and oversampling factor {ofactor}")]
    NoKernelForWidth {
        /// Requested support width
        width: usize,
        /// Requested oversampling factor
        ofactor: f64,
    },
}

/// Extension of the Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;
