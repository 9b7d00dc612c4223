//! One-sided Jacobi SVD implementation
//!
//! Hestenes' method: plane rotations are applied to pairs of columns until
//! all columns are mutually orthogonal to working precision. The column
//! norms are then the singular values. The method is slower than
//! bidiagonalization but computes small singular values to high relative
//! accuracy, which is what the kernel matrices need.

use ndarray::{s, Array1, Array2};
use std::cmp::Ordering;

use crate::precision::Precision;
use crate::utils::norm_2;

/// Result of SVD decomposition: A = U * diag(s) * V^T
#[derive(Debug, Clone)]
pub struct SVDResult<T: Precision> {
    /// Left singular vectors (m × k)
    pub u: Array2<T>,
    /// Singular values in descending order (k)
    pub s: Array1<T>,
    /// Right singular vectors (n × k)
    pub v: Array2<T>,
    /// Number of singular triplets, k = min(m, n)
    pub rank: usize,
}

/// Configuration for the Jacobi iteration
#[derive(Debug, Clone)]
pub struct JacobiConfig {
    /// Maximum number of sweeps over all column pairs
    pub max_sweeps: usize,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self { max_sweeps: 60 }
    }
}

impl JacobiConfig {
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }
}

/// Error types for SVD computation
#[derive(Debug, thiserror::Error)]
pub enum SVDError {
    #[error("Matrix is empty")]
    EmptyMatrix,

    #[error("Matrix contains a non-finite entry at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("Jacobi iteration did not converge within {sweeps} sweeps")]
    NotConverged { sweeps: usize },
}

/// Jacobi SVD with the default configuration
pub fn jacobi_svd<T: Precision>(matrix: &Array2<T>) -> Result<SVDResult<T>, SVDError> {
    jacobi_svd_with_config(matrix, &JacobiConfig::default())
}

/// Jacobi SVD algorithm
///
/// Wide matrices are handled through the transpose, so the iteration always
/// runs on a matrix with at least as many rows as columns.
pub fn jacobi_svd_with_config<T: Precision>(
    matrix: &Array2<T>,
    config: &JacobiConfig,
) -> Result<SVDResult<T>, SVDError> {
    let (m, n) = matrix.dim();
    if m == 0 || n == 0 {
        return Err(SVDError::EmptyMatrix);
    }
    if let Some(((row, col), _)) = matrix.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(SVDError::NonFinite { row, col });
    }

    if m < n {
        let transposed = Array2::from_shape_fn((n, m), |(i, j)| matrix[[j, i]]);
        let result = one_sided_jacobi(&transposed, config)?;
        return Ok(SVDResult {
            u: result.v,
            s: result.s,
            v: result.u,
            rank: result.rank,
        });
    }

    one_sided_jacobi(matrix, config)
}

/// Rotate rows p and q in place: (x, y) -> (c x - s y, s x + c y)
fn rotate_rows<T: Precision>(matrix: &mut Array2<T>, p: usize, q: usize, c: T, s: T) {
    let (mut row_p, mut row_q) = matrix.multi_slice_mut((s![p, ..], s![q, ..]));
    for (x, y) in row_p.iter_mut().zip(row_q.iter_mut()) {
        let xp = *x;
        let yq = *y;
        *x = c * xp - s * yq;
        *y = s * xp + c * yq;
    }
}

/// Requires m >= n.
fn one_sided_jacobi<T: Precision>(
    matrix: &Array2<T>,
    config: &JacobiConfig,
) -> Result<SVDResult<T>, SVDError> {
    let (m, n) = matrix.dim();

    // Rows of `w` are the columns of A so that rotations touch contiguous memory
    let mut w = Array2::from_shape_fn((n, m), |(i, j)| matrix[[j, i]]);
    let mut vt = Array2::from_shape_fn((n, n), |(i, j)| if i == j { T::one() } else { T::zero() });

    let tol = T::epsilon() * T::from_f64(m as f64);
    let tiny = T::min_positive();
    let two = T::from_f64(2.0);

    let mut converged = false;
    let mut sweeps = 0;
    while sweeps < config.max_sweeps {
        sweeps += 1;
        let mut rotated = false;

        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                let (alpha, beta, gamma) = {
                    let row_p = w.row(p);
                    let row_q = w.row(q);
                    let mut alpha = T::zero();
                    let mut beta = T::zero();
                    let mut gamma = T::zero();
                    for (&x, &y) in row_p.iter().zip(row_q.iter()) {
                        alpha += x * x;
                        beta += y * y;
                        gamma += x * y;
                    }
                    (alpha, beta, gamma)
                };

                if alpha <= tiny || beta <= tiny {
                    continue;
                }
                if gamma.abs() <= tol * alpha.sqrt() * beta.sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (two * gamma);
                let sign = if zeta >= T::zero() { T::one() } else { -T::one() };
                let t = sign / (zeta.abs() + (T::one() + zeta * zeta).sqrt());
                let c = T::one() / (T::one() + t * t).sqrt();
                let s = c * t;

                rotate_rows(&mut w, p, q, c, s);
                rotate_rows(&mut vt, p, q, c, s);
            }
        }

        if !rotated {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "Jacobi SVD ({}x{}) stopped after {} sweeps without full convergence",
            m,
            n,
            config.max_sweeps
        );
        return Err(SVDError::NotConverged {
            sweeps: config.max_sweeps,
        });
    }
    log::trace!("Jacobi SVD ({}x{}) converged after {} sweeps", m, n, sweeps);

    let norms: Vec<T> = (0..n).map(|j| norm_2(w.row(j))).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| norms[b].partial_cmp(&norms[a]).unwrap_or(Ordering::Equal));

    let mut u = Array2::from_elem((m, n), T::zero());
    let mut sv = Array1::from_elem(n, T::zero());
    let mut v = Array2::from_elem((n, n), T::zero());
    for (k, &j) in order.iter().enumerate() {
        let sj = norms[j];
        sv[k] = sj;
        if sj > T::zero() {
            for i in 0..m {
                u[[i, k]] = w[[j, i]] / sj;
            }
        }
        for i in 0..n {
            v[[i, k]] = vt[[j, i]];
        }
    }

    Ok(SVDResult {
        u,
        s: sv,
        v,
        rank: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::Df64;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_rotate_rows_preserves_norm() {
        let mut a = array![[3.0, 0.0], [4.0, 1.0]];
        let (c, s) = (0.6, 0.8);
        rotate_rows(&mut a, 0, 1, c, s);
        let norm: f64 = a.iter().map(|x| x * x).sum();
        assert_abs_diff_eq!(norm, 26.0, epsilon = 1e-12);
    }

    #[test]
    fn test_jacobi_svd_identity() {
        let a: Array2<f64> = Array2::eye(3);
        let result = jacobi_svd(&a).unwrap();

        for &s in result.s.iter() {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-10);
        }
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(result.u[[i, j]].abs(), expected, epsilon = 1e-10);
                assert_abs_diff_eq!(result.v[[i, j]].abs(), expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_jacobi_svd_rank_one() {
        let a = array![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        let result = jacobi_svd(&a).unwrap();

        assert_abs_diff_eq!(result.s[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.s[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.s[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_jacobi_svd_2x2() {
        // Singular values of [[3, 0], [4, 5]] are sqrt(45) and sqrt(5)
        let a = array![[3.0, 0.0], [4.0, 5.0]];
        let result = jacobi_svd(&a).unwrap();
        assert_abs_diff_eq!(result.s[0], 45.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(result.s[1], 5.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_jacobi_svd_df64_diagonal() {
        let a = Array2::from_shape_fn((3, 3), |(i, j)| {
            if i == j { Df64::from(10f64.powi(-(i as i32) * 10)) } else { Df64::zero() }
        });
        let result = jacobi_svd(&a).unwrap();
        assert_eq!(result.s[0].to_f64(), 1.0);
        assert_eq!(result.s[1].to_f64(), 1e-10);
        assert_eq!(result.s[2].to_f64(), 1e-20);
    }

    #[test]
    fn test_empty_matrix() {
        let a: Array2<f64> = Array2::zeros((0, 3));
        assert!(matches!(jacobi_svd(&a), Err(SVDError::EmptyMatrix)));
    }

    #[test]
    fn test_non_finite_entry() {
        let a = array![[1.0, f64::NAN], [0.0, 1.0]];
        assert!(matches!(
            jacobi_svd(&a),
            Err(SVDError::NonFinite { row: 0, col: 1 })
        ));
    }
}
