//! Section edges adapted to the kernel
//!
//! The singular functions oscillate faster where the kernel varies faster.
//! A coarse f64 SVE of the even sector locates the zeros of the highest
//! retained singular functions, and those zeros become the section edges of
//! the accurate construction.

use crate::error::{IrError, Result};
use crate::gauss::legendre;
use crate::kernel::{Kernel, SymmetryType};
use crate::kernelmatrix::matrix_from_gauss;
use xprec_svd::jacobi_svd;

/// Smallest relative singular value a double precision SVD resolves
pub const SECTION_CUTOFF: f64 = 1e-12;

/// Approximate section edges on [0, 1] for x and y
///
/// # Arguments
/// * `kernel` - Kernel whose even sector is discretized
/// * `n_points` - Gauss-Legendre points of the coarse discretization
/// * `cutoff` - Relative singular value threshold; values below 1e-12 are
///   raised to 1e-12
///
/// # Returns
/// `(edges_x, edges_y)`, each `[0, zeros..., 1]`
pub fn approximate_section_edges<K: Kernel>(
    kernel: &K,
    n_points: usize,
    cutoff: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if n_points < 2 {
        return Err(IrError::InvalidParameter(format!(
            "section search needs at least 2 points, got {}",
            n_points
        )));
    }
    if !(cutoff > 0.0 && cutoff < 1.0) {
        return Err(IrError::InvalidParameter(format!(
            "cutoff must lie in (0, 1), got {}",
            cutoff
        )));
    }

    let rule = legendre::<f64>(n_points).reseat(0.0, 1.0);
    let matrix = matrix_from_gauss(kernel, &rule, &rule, SymmetryType::Even);
    let svd = jacobi_svd(&matrix)?;

    let s0 = svd.s[0];
    if !(s0 > 0.0) {
        return Err(IrError::EmptyBasis);
    }
    let rtol = cutoff.max(SECTION_CUTOFF);
    let dim = svd.s.iter().take_while(|&&s| s / s0 >= rtol).count();
    let last = dim - 1;

    let sqrt_w: Vec<f64> = rule.w.iter().map(|w| w.sqrt()).collect();
    let u_last: Vec<f64> = (0..n_points).map(|i| svd.u[[i, last]] / sqrt_w[i]).collect();
    let v_last: Vec<f64> = (0..n_points).map(|i| svd.v[[i, last]] / sqrt_w[i]).collect();

    let edges_x = edges_from_zeros(sign_changes(&rule.x, &u_last));
    let edges_y = edges_from_zeros(sign_changes(&rule.x, &v_last));
    log::debug!(
        "section search: {} even singular values above {:e}, {} x sections, {} y sections",
        dim,
        rtol,
        edges_x.len() - 1,
        edges_y.len() - 1
    );
    Ok((edges_x, edges_y))
}

/// Zeros of a sampled function: samples that are exactly zero, and linear
/// interpolation between neighbouring samples of opposite sign
pub(crate) fn sign_changes(x: &[f64], f: &[f64]) -> Vec<f64> {
    let n = x.len().min(f.len());
    let mut zeros = Vec::new();
    for i in 0..n {
        if f[i] == 0.0 {
            zeros.push(x[i]);
        } else if i + 1 < n && f[i] * f[i + 1] < 0.0 {
            zeros.push(x[i] - f[i] * (x[i + 1] - x[i]) / (f[i + 1] - f[i]));
        }
    }
    zeros
}

fn edges_from_zeros(zeros: Vec<f64>) -> Vec<f64> {
    let mut edges = Vec::with_capacity(zeros.len() + 2);
    edges.push(0.0);
    edges.extend(zeros.into_iter().filter(|&z| z > 0.0 && z < 1.0));
    edges.push(1.0);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{BosonicKernel, FermionicKernel};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sign_changes() {
        let x: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();
        let f: Vec<f64> = x.iter().map(|&x| x - 0.35).collect();
        let zeros = sign_changes(&x, &f);
        assert_eq!(zeros.len(), 1);
        assert_abs_diff_eq!(zeros[0], 0.35, epsilon = 1e-14);

        let g: Vec<f64> = x.iter().map(|&x| (x - 0.25) * (x - 0.75)).collect();
        assert_eq!(sign_changes(&x, &g).len(), 2);
    }

    #[test]
    fn test_sign_changes_on_sample_points() {
        let x = [0.1, 0.2, 0.3, 0.4, 0.5];
        assert_eq!(sign_changes(&x, &[-2.0, -1.0, 0.0, 1.0, 2.0]), vec![0.3]);
        // Two zeros hit exactly stay two sections apart
        assert_eq!(sign_changes(&x, &[1.0, 0.0, -1.0, 0.0, 1.0]), vec![0.2, 0.4]);
        // Exact and interpolated zeros come out in order
        let zeros = sign_changes(&x, &[0.0, 1.0, -1.0, -1.0, 0.0]);
        assert_eq!(zeros.len(), 3);
        assert_eq!(zeros[0], 0.1);
        assert_abs_diff_eq!(zeros[1], 0.25, epsilon = 1e-15);
        assert_eq!(zeros[2], 0.5);
        let edges = edges_from_zeros(zeros);
        assert_eq!(edges.len(), 5);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_edges_are_partitions_of_unit_interval() {
        for lambda in [1.0, 10.0, 100.0] {
            let kernel = FermionicKernel::new(lambda).unwrap();
            let (edges_x, edges_y) = approximate_section_edges(&kernel, 120, 1e-12).unwrap();
            for edges in [&edges_x, &edges_y] {
                assert_eq!(edges[0], 0.0);
                assert_eq!(*edges.last().unwrap(), 1.0);
                assert!(edges.len() >= 2);
                for i in 1..edges.len() {
                    assert!(edges[i] > edges[i - 1]);
                }
            }
        }
    }

    #[test]
    fn test_sections_grow_with_lambda() {
        let small = FermionicKernel::new(1.0).unwrap();
        let large = FermionicKernel::new(100.0).unwrap();
        let (x_small, _) = approximate_section_edges(&small, 120, 1e-12).unwrap();
        let (x_large, _) = approximate_section_edges(&large, 120, 1e-12).unwrap();
        assert!(x_large.len() > x_small.len());
    }

    #[test]
    fn test_looser_cutoff_gives_fewer_sections() {
        let kernel = BosonicKernel::new(50.0).unwrap();
        let (fine, _) = approximate_section_edges(&kernel, 120, 1e-12).unwrap();
        let (coarse, _) = approximate_section_edges(&kernel, 120, 1e-4).unwrap();
        assert!(coarse.len() < fine.len());
    }

    #[test]
    fn test_invalid_arguments() {
        let kernel = FermionicKernel::new(1.0).unwrap();
        assert!(approximate_section_edges(&kernel, 1, 1e-12).is_err());
        assert!(approximate_section_edges(&kernel, 50, 0.0).is_err());
        assert!(approximate_section_edges(&kernel, 50, 1.5).is_err());
    }
}
