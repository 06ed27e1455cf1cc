//! Kernel parameter table and lookups
//!
//! The table maps a support width and an oversampling factor to the shape
//! parameters of an exponential-of-semicircle kernel that minimise the
//! gridding error for that combination. It is compiled in and never mutated.
//!
//! Lookups here only filter the table. Deciding which entry is best for a
//! target accuracy is left to the caller.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;

mod table;

pub use self::table::KERNEL_DB;

/// Tolerance used when matching a requested oversampling factor
const OFACTOR_TOLERANCE: f64 = 1e-9;

/// Shape parameters of one table entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KernelParams {
    /// Support width in grid cells (number of polynomial segments)
    pub w: usize,
    /// Oversampling factor the parameters were tuned for
    pub ofactor: f64,
    /// Achievable gridding error for this combination
    pub epsilon: f64,
    /// Steepness per unit of support width
    pub beta: f64,
    /// Exponent applied to the semicircle profile
    pub e0: f64,
    /// Ratio of the largest to the smallest correction factor over the usable field
    pub correction_range: f64,
}

impl KernelParams {
    /// Create a parameter record
    pub const fn new(
        w: usize,
        ofactor: f64,
        epsilon: f64,
        beta: f64,
        e0: f64,
        correction_range: f64,
    ) -> Self {
        Self {
            w,
            ofactor,
            epsilon,
            beta,
            e0,
            correction_range,
        }
    }

    /// Absolute steepness of the kernel, i.e. `beta` scaled by the support width
    pub fn absolute_beta(&self) -> f64 {
        self.beta * self.w as f64
    }

    /// Polynomial degree used to represent this kernel, `W + extra`
    pub fn degree(&self, extra: usize) -> usize {
        self.w + extra
    }
}

lazy_static! {
    /// Map from support width to the index range of its rows in `KERNEL_DB`
    static ref WIDTH_INDEX: HashMap<usize, Range<usize>> = {
        let mut m: HashMap<usize, Range<usize>> = HashMap::new();
        for (i, params) in KERNEL_DB.iter().enumerate() {
            m.entry(params.w)
                .and_modify(|range| range.end = i + 1)
                .or_insert(i..i + 1);
        }
        m
    };
}

/// Number of entries in the table
pub fn table_len() -> usize {
    KERNEL_DB.len()
}

/// Get the parameters stored at `index`
pub fn kernel_params(index: usize) -> Option<&'static KernelParams> {
    KERNEL_DB.get(index)
}

/// Index range of the rows with support width `w`
pub fn width_range(w: usize) -> Option<Range<usize>> {
    WIDTH_INDEX.get(&w).cloned()
}

/// All rows with support width `w`, in increasing oversampling order
///
/// Returns an empty slice when the width is not in the table.
pub fn kernels_with_width(w: usize) -> &'static [KernelParams] {
    match width_range(w) {
        Some(range) => &KERNEL_DB[range],
        None => &[],
    }
}

/// Find the table index for an exact (width, oversampling factor) pair
pub fn find_kernel(w: usize, ofactor: f64) -> Option<usize> {
    let range = width_range(w)?;
    let start = range.start;
    KERNEL_DB[range]
        .iter()
        .position(|p| (p.ofactor - ofactor).abs() < OFACTOR_TOLERANCE)
        .map(|offset| start + offset)
}

/// Support widths present in the table, ascending
pub fn supported_widths() -> Vec<usize> {
    let mut widths: Vec<usize> = WIDTH_INDEX.keys().copied().collect();
    widths.sort_unstable();
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_size() {
        assert_eq!(table_len(), 325);
        assert_eq!(supported_widths(), (4..=16).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_entry() {
        let p = kernel_params(0).unwrap();
        assert_eq!(p.w, 4);
        assert_eq!(p.ofactor, 1.15);
        assert_eq!(p.degree(3), 7);
        assert!((p.absolute_beta() - 4.0 * 1.38734266900695391).abs() < 1e-15);
    }

    #[test]
    fn test_out_of_range() {
        assert!(kernel_params(table_len()).is_none());
    }

    #[test]
    fn test_width_groups_are_contiguous() {
        let mut covered = 0;
        for w in supported_widths() {
            let range = width_range(w).unwrap();
            assert_eq!(range.start, covered);
            assert!(kernels_with_width(w).iter().all(|p| p.w == w));
            covered = range.end;
        }
        assert_eq!(covered, table_len());
    }

    #[test]
    fn test_group_sizes() {
        let sizes: Vec<usize> = supported_widths()
            .into_iter()
            .map(|w| kernels_with_width(w).len())
            .collect();
        assert_eq!(
            sizes,
            vec![28, 28, 28, 28, 27, 26, 25, 25, 23, 23, 22, 21, 21]
        );
    }

    #[test]
    fn test_find_kernel() {
        assert_eq!(find_kernel(4, 1.15), Some(0));
        assert_eq!(find_kernel(5, 1.15), Some(28));
        let idx = find_kernel(8, 2.0).unwrap();
        assert_eq!(KERNEL_DB[idx].w, 8);
        assert_eq!(KERNEL_DB[idx].ofactor, 2.0);
    }

    #[test]
    fn test_pruned_rows_absent() {
        assert_eq!(find_kernel(8, 1.15), None);
        assert_eq!(find_kernel(15, 1.45), None);
        assert_eq!(find_kernel(16, 1.45), None);
        assert_eq!(find_kernel(3, 2.0), None);
        assert!(kernels_with_width(17).is_empty());
    }
}
