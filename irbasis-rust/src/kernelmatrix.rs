//! Kernel matrix discretization
//!
//! A kernel is represented in the basis of normalized Legendre polynomials
//! on every section of the x and y partitions:
//!
//! ```text
//! φ_{s,l}(x) = √(2/h_s) √(l + 1/2) P_l(ξ),   ξ = 2(x - x_s)/h_s - 1
//! K[(s, l), (s', l')] = ∫∫ φ_{s,l}(x) K(x, y) φ_{s',l'}(y) dx dy
//! ```
//!
//! The φ are orthonormal, so the singular values of the matrix approximate
//! those of the integral operator.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{IrError, Result};
use crate::gauss::{Rule, legendre, normalized_legendre_p_all};
use crate::kernel::{Kernel, SymmetryType};
use crate::numeric::CustomNumeric;

/// Design matrices φ_s(l, n) = √(2/h_s) P̃_l(ξ_n) w_{s,n}, one per section
fn design_matrices<T: CustomNumeric>(
    composite: &Rule<T>,
    edges: &[T],
    legendre_values: &[Vec<T>],
    nl: usize,
) -> Vec<Array2<T>> {
    let n_local = legendre_values.len();
    edges
        .windows(2)
        .enumerate()
        .map(|(s, pair)| {
            let norm = (T::from_f64(2.0) / (pair[1] - pair[0])).sqrt();
            Array2::from_shape_fn((nl, n_local), |(l, n)| {
                norm * legendre_values[n][l] * composite.w[s * n_local + n]
            })
        })
        .collect()
}

/// Compute the matrix representation of f in the section-wise Legendre basis
///
/// # Arguments
/// * `f` - Function of (x, y) to represent
/// * `edges_x` - Section edges on the x axis
/// * `edges_y` - Section edges on the y axis
/// * `num_local_nodes` - Gauss-Legendre nodes per section
/// * `nl` - Legendre polynomials per section
///
/// # Returns
/// Matrix of shape `(nsx * nl, nsy * nl)`; the block for sections (s, s')
/// sits at rows `nl*s..nl*(s+1)` and columns `nl*s'..nl*(s'+1)`.
pub fn matrix_rep<T, F>(
    f: F,
    edges_x: &[T],
    edges_y: &[T],
    num_local_nodes: usize,
    nl: usize,
) -> Result<Array2<T>>
where
    T: CustomNumeric,
    F: Fn(T, T) -> T + Sync,
{
    if nl == 0 || num_local_nodes == 0 {
        return Err(IrError::InvalidParameter(format!(
            "nl ({}) and the number of local nodes ({}) must be positive",
            nl, num_local_nodes
        )));
    }

    let rule = legendre::<T>(num_local_nodes);
    let nodes_x = rule.piecewise(edges_x)?;
    let nodes_y = rule.piecewise(edges_y)?;
    let nsx = edges_x.len() - 1;
    let nsy = edges_y.len() - 1;

    let legendre_values: Vec<Vec<T>> = rule
        .x
        .iter()
        .map(|&xi| normalized_legendre_p_all(nl, xi))
        .collect();
    let phi_x = design_matrices(&nodes_x, edges_x, &legendre_values, nl);
    let phi_y = design_matrices(&nodes_y, edges_y, &legendre_values, nl);

    let n = num_local_nodes;
    let blocks: Vec<Array2<T>> = (0..nsx * nsy)
        .into_par_iter()
        .map(|idx| {
            let (s, s2) = (idx / nsy, idx % nsy);
            let k_nn = Array2::from_shape_fn((n, n), |(i, j)| {
                f(nodes_x.x[s * n + i], nodes_y.x[s2 * n + j])
            });

            // phi_x[s] * K_nn
            let px = &phi_x[s];
            let tmp = Array2::from_shape_fn((nl, n), |(l, j)| {
                (0..n).fold(T::zero(), |acc, i| acc + px[[l, i]] * k_nn[[i, j]])
            });
            // (phi_x[s] * K_nn) * phi_y[s2]^T
            let py = &phi_y[s2];
            Array2::from_shape_fn((nl, nl), |(l, l2)| {
                (0..n).fold(T::zero(), |acc, j| acc + tmp[[l, j]] * py[[l2, j]])
            })
        })
        .collect();

    let mut matrix = Array2::from_elem((nsx * nl, nsy * nl), T::zero());
    for (idx, block) in blocks.iter().enumerate() {
        let (s, s2) = (idx / nsy, idx % nsy);
        for l in 0..nl {
            for l2 in 0..nl {
                matrix[[nl * s + l, nl * s2 + l2]] = block[[l, l2]];
            }
        }
    }

    log::debug!(
        "kernel matrix {}x{} ({} x {} sections, nl = {}, {} local nodes)",
        matrix.nrows(),
        matrix.ncols(),
        nsx,
        nsy,
        nl,
        n
    );
    Ok(matrix)
}

/// Matrices of the even and odd sectors on the half domain [0, 1] x [0, 1]
///
/// # Returns
/// `(even, odd)`, the representations of K(x, y) ± K(x, -y).
pub fn even_odd_matrices<T, K>(
    kernel: &K,
    edges_x: &[T],
    edges_y: &[T],
    num_local_nodes: usize,
    nl: usize,
) -> Result<(Array2<T>, Array2<T>)>
where
    T: CustomNumeric,
    K: Kernel,
{
    let even = matrix_rep(
        |x, y| kernel.compute_reduced(x, y, SymmetryType::Even),
        edges_x,
        edges_y,
        num_local_nodes,
        nl,
    )?;
    let odd = matrix_rep(
        |x, y| kernel.compute_reduced(x, y, SymmetryType::Odd),
        edges_x,
        edges_y,
        num_local_nodes,
        nl,
    )?;
    Ok((even, odd))
}

/// Kernel sector sampled on Gauss points with √w weighting
///
/// Entry (i, j) is √w_i K_±(x_i, y_j) √w_j, whose singular values
/// approximate those of the integral operator.
pub fn matrix_from_gauss<T, K>(
    kernel: &K,
    gauss_x: &Rule<T>,
    gauss_y: &Rule<T>,
    symmetry: SymmetryType,
) -> Array2<T>
where
    T: CustomNumeric,
    K: Kernel,
{
    let sqrt_wx: Vec<T> = gauss_x.w.iter().map(|w| w.sqrt()).collect();
    let sqrt_wy: Vec<T> = gauss_y.w.iter().map(|w| w.sqrt()).collect();
    Array2::from_shape_fn((gauss_x.len(), gauss_y.len()), |(i, j)| {
        sqrt_wx[i] * kernel.compute_reduced(gauss_x.x[i], gauss_y.x[j], symmetry) * sqrt_wy[j]
    })
}

#[cfg(test)]
#[path = "kernelmatrix_tests.rs"]
mod tests;
