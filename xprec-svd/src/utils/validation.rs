//! Result validation utilities

use crate::precision::Precision;
use crate::svd::SVDResult;
use ndarray::{Array2, ArrayView2};

/// Validate SVD result
///
/// Checks that A = U * S * V^T holds, that U and V have orthonormal columns
/// and that the singular values are non-negative and sorted.
pub fn validate_svd<T: Precision>(original: &Array2<T>, svd: &SVDResult<T>, tolerance: T) -> bool {
    let (m, n) = original.dim();
    let k = svd.s.len();

    if svd.u.dim() != (m, k) || svd.v.dim() != (n, k) {
        return false;
    }

    // Columns of U belonging to zero singular values are left at zero
    let nonzero = svd.s.iter().filter(|&&s| s > T::zero()).count();
    if !has_orthonormal_columns(svd.u.view(), nonzero, tolerance) {
        return false;
    }
    if !has_orthonormal_columns(svd.v.view(), k, tolerance) {
        return false;
    }
    if !is_singular_values_valid(svd, tolerance) {
        return false;
    }

    reconstruction_error(original, svd) <= tolerance
}

/// Check that the first `k` columns are orthonormal
fn has_orthonormal_columns<T: Precision>(matrix: ArrayView2<T>, k: usize, tolerance: T) -> bool {
    let rows = matrix.nrows();
    for i in 0..k {
        for j in 0..k {
            let mut sum = T::zero();
            for row in 0..rows {
                sum += matrix[[row, i]] * matrix[[row, j]];
            }
            let expected = if i == j { T::one() } else { T::zero() };
            if (sum - expected).abs() > tolerance {
                return false;
            }
        }
    }
    true
}

/// Check that singular values are non-negative and in descending order
fn is_singular_values_valid<T: Precision>(svd: &SVDResult<T>, tolerance: T) -> bool {
    let s = &svd.s;
    if s.iter().any(|&x| x < -tolerance) {
        return false;
    }
    s.windows(2).into_iter().all(|w| w[0] >= w[1])
}

/// Maximum absolute entry of A - U * S * V^T
pub fn reconstruction_error<T: Precision>(original: &Array2<T>, svd: &SVDResult<T>) -> T {
    let (m, n) = original.dim();
    let k = svd.s.len();
    let mut max_err = T::zero();
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for l in 0..k {
                sum += svd.u[[i, l]] * svd.s[l] * svd.v[[j, l]];
            }
            max_err = max_err.max((original[[i, j]] - sum).abs());
        }
    }
    max_err
}
