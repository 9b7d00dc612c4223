//! Matsubara transforms of the basis functions
//!
//! For an integer o ≥ 0 and θ = πo/2 the shifted transform is
//!
//! ```text
//! Tbar_ol = ∫_{-1}^{1} e^{iθ(x+1)} u_l(x) dx
//! ```
//!
//! Because u_l has parity (-1)^l only the half domain is integrated:
//! e^{iθ} 2∫_0^1 cos(θx) u_l(x) dx for even l and
//! i e^{iθ} 2∫_0^1 sin(θx) u_l(x) dx for odd l. The Matsubara transform is
//! Tnl = √2 Tbar_{o(n), l} with o(n) = 2n + 1 for fermions and 2n for bosons.

use ndarray::Array2;
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::{PI, SQRT_2};

use crate::error::{IrError, Result};
use crate::gauss::{Rule, legendre};
use crate::poly::PiecewisePolynomial;
use crate::traits::Statistics;

/// Gauss-Legendre nodes per integration piece unless the polynomial order
/// asks for more
pub const DEFAULT_QUADRATURE_ORDER: usize = 12;

fn validate_indices(indices: &[i64], name: &str) -> Result<()> {
    if let Some(&bad) = indices.iter().find(|&&i| i < 0) {
        return Err(IrError::InvalidFrequencyIndex(format!(
            "{} indices must be non-negative, got {}",
            name, bad
        )));
    }
    if let Some(pos) = indices.windows(2).position(|w| w[1] < w[0]) {
        return Err(IrError::InvalidFrequencyIndex(format!(
            "{} indices must be in ascending order ({} follows {})",
            name,
            indices[pos + 1],
            indices[pos]
        )));
    }
    Ok(())
}

/// e^{iπo/2} = i^o, exactly
fn phase(o: i64) -> Complex64 {
    match o.rem_euclid(4) {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    }
}

/// ∫_0^1 cos(θx) u(x) dx, or the sine transform when `odd`
///
/// Every section inside [0, 1] is cut into pieces over which θx advances
/// by at most π, and each piece is integrated with `rule`.
fn half_domain_transform(
    u: &PiecewisePolynomial<f64>,
    theta: f64,
    odd: bool,
    rule: &Rule<f64>,
) -> f64 {
    let edges = u.section_edges();
    let mut sum = 0.0;
    for s in 0..u.num_sections() {
        let a = edges[s].max(0.0);
        let b = edges[s + 1].min(1.0);
        if !(b > a) {
            continue;
        }
        let pieces = ((theta * (b - a) / PI).ceil() as usize).max(1);
        let half_width = 0.5 * (b - a) / pieces as f64;
        for p in 0..pieces {
            let center = a + (2 * p + 1) as f64 * half_width;
            sum += rule
                .x
                .iter()
                .zip(rule.w.iter())
                .map(|(&xi, &wi)| {
                    let x = center + half_width * xi;
                    let f = u.evaluate_section(s, x - edges[s]);
                    let trig = if odd { (theta * x).sin() } else { (theta * x).cos() };
                    half_width * wi * trig * f
                })
                .sum::<f64>();
        }
    }
    sum
}

/// Compute Tbar_ol for the given o indices
///
/// # Arguments
/// * `o_indices` - Non-negative integers in ascending order
/// * `u_basis` - Basis functions on [-1, 1]; u_l must have parity (-1)^l
/// * `quadrature_order` - Minimum Gauss-Legendre nodes per piece
///
/// # Returns
/// Matrix of shape `(o_indices.len(), u_basis.len())`
pub fn compute_tbar_ol(
    o_indices: &[i64],
    u_basis: &[PiecewisePolynomial<f64>],
    quadrature_order: usize,
) -> Result<Array2<Complex64>> {
    validate_indices(o_indices, "o")?;
    if quadrature_order == 0 {
        return Err(IrError::InvalidParameter(
            "quadrature_order must be positive".to_string(),
        ));
    }

    let max_order = u_basis.iter().map(|u| u.order()).max().unwrap_or(0);
    let rule = legendre::<f64>(quadrature_order.max(2 * (max_order + 1)));

    let rows: Vec<Vec<Complex64>> = o_indices
        .par_iter()
        .map(|&o| {
            let theta = 0.5 * PI * o as f64;
            let z = phase(o);
            u_basis
                .iter()
                .enumerate()
                .map(|(l, u)| {
                    let odd = l % 2 == 1;
                    let integral = 2.0 * half_domain_transform(u, theta, odd, &rule);
                    if odd {
                        z * Complex64::new(0.0, integral)
                    } else {
                        z * integral
                    }
                })
                .collect()
        })
        .collect();

    log::debug!(
        "Tbar_ol for {} o indices and {} functions ({} nodes per piece)",
        o_indices.len(),
        u_basis.len(),
        rule.len()
    );
    Ok(Array2::from_shape_fn(
        (o_indices.len(), u_basis.len()),
        |(i, l)| rows[i][l],
    ))
}

/// Compute the transformation matrix to Matsubara frequencies
///
/// # Arguments
/// * `n_indices` - Non-negative Matsubara indices in ascending order
/// * `statistics` - Fermionic (ω_n = (2n+1)π/β) or bosonic (ω_n = 2nπ/β)
/// * `u_basis` - Basis functions on [-1, 1]; u_l must have parity (-1)^l
/// * `quadrature_order` - Minimum Gauss-Legendre nodes per piece
///
/// # Returns
/// Matrix of shape `(n_indices.len(), u_basis.len())`
pub fn compute_tnl(
    n_indices: &[i64],
    statistics: Statistics,
    u_basis: &[PiecewisePolynomial<f64>],
    quadrature_order: usize,
) -> Result<Array2<Complex64>> {
    validate_indices(n_indices, "Matsubara")?;
    let o_indices: Vec<i64> = n_indices
        .iter()
        .map(|&n| statistics.frequency_index(n))
        .collect();
    let tbar = compute_tbar_ol(&o_indices, u_basis, quadrature_order)?;
    Ok(tbar.mapv(|t| t * SQRT_2))
}

#[cfg(test)]
#[path = "polyfourier_tests.rs"]
mod tests;
