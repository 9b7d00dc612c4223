//! Reconstruction of singular functions on [-1, 1]
//!
//! A singular vector holds the coefficients c_{s,j} of the half-domain
//! function Σ c_{s,j} √(2/h_s) P̃_j(ξ) on [0, 1]. Each section is turned into a
//! monomial expansion about its left edge, ξ = -1, using
//!
//! ```text
//! coeff[d] = Σ_j c_{s,j} h^{-1/2} (2/h)^d P̃_j^{(d)}(-1) / d!
//! ```
//!
//! The prefactor is h^{-1/2} rather than √(2/h) so that the function
//! extended to [-1, 1] has unit norm. The extension to negative arguments
//! uses the parity of the sector.

use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::gauss::normalized_legendre_p_derivatives_at_minus_one;
use crate::kernel::SymmetryType;
use crate::numeric::CustomNumeric;
use crate::poly::PiecewisePolynomial;

use super::result::{BasisFunctions, SVEResult};

/// Full-domain sections covered by half-domain section `s`
///
/// With `n_half` sections on [0, 1] the full partition has `2 * n_half`
/// sections. Section `s` of [0, 1] is section `n_half + s` of [-1, 1], and
/// its mirror image under x → -x is section `n_half - 1 - s`.
pub fn mirrored_sections(n_half: usize, s: usize) -> (usize, usize) {
    (n_half + s, n_half - 1 - s)
}

/// Full partition of [-1, 1] from a partition of [0, 1]
pub fn full_domain_edges<T: CustomNumeric>(half_edges: &[T]) -> Vec<f64> {
    let positive: Vec<f64> = half_edges[1..].iter().map(|e| e.to_f64()).collect();
    let mut edges: Vec<f64> = positive.iter().rev().map(|&e| -e).collect();
    edges.push(0.0);
    edges.extend(positive);
    edges
}

/// Precomputed tables shared by all functions of one reconstruction
struct LegendreTables<T> {
    /// d^k/dx^k P̃_j(-1), indexed [j][k]
    derivatives: Vec<Vec<T>>,
    inv_factorial: Vec<T>,
}

impl<T: CustomNumeric> LegendreTables<T> {
    fn new(nl: usize) -> Self {
        let mut inv_factorial = Vec::with_capacity(nl);
        let mut value = T::one();
        for d in 0..nl {
            if d > 0 {
                value /= T::from_usize(d);
            }
            inv_factorial.push(value);
        }
        Self {
            derivatives: normalized_legendre_p_derivatives_at_minus_one(nl),
            inv_factorial,
        }
    }
}

/// Monomial coefficients on the full partition for one singular vector
fn monomial_coefficients<T: CustomNumeric>(
    vector: &Array1<T>,
    half_edges: &[T],
    nl: usize,
    symmetry: SymmetryType,
    tables: &LegendreTables<T>,
) -> Array2<f64> {
    let n_half = half_edges.len() - 1;
    let parity = T::from_f64(f64::from(symmetry.sign()));
    let two = T::from_f64(2.0);
    let mut coeff = Array2::from_elem((2 * n_half, nl), T::zero());

    for (s, pair) in half_edges.windows(2).enumerate() {
        let h = pair[1] - pair[0];
        let (positive, mirrored) = mirrored_sections(n_half, s);
        for j in 0..nl {
            // P̃_j(-ξ) = (-1)^j P̃_j(ξ)
            let mirror_sign = if j % 2 == 0 { parity } else { -parity };
            let mut scale = T::one() / h.sqrt();
            for d in 0..nl {
                let term =
                    tables.inv_factorial[d] * scale * vector[s * nl + j] * tables.derivatives[j][d];
                coeff[[positive, d]] += term;
                coeff[[mirrored, d]] += mirror_sign * term;
                scale *= two / h;
            }
        }
    }
    coeff.mapv(|c| c.to_f64())
}

/// Turn the truncated expansion into piecewise polynomials on [-1, 1]
///
/// Every pair is sign-fixed so that u_l(1) ≥ 0; v_l is flipped with u_l.
pub fn reconstruct_basis<T: CustomNumeric>(sve: &SVEResult<T>) -> Result<BasisFunctions> {
    let tables = LegendreTables::<T>::new(sve.nl);
    let full_x = full_domain_edges(&sve.edges_x);
    let full_y = full_domain_edges(&sve.edges_y);

    let mut u = Vec::with_capacity(sve.len());
    let mut v = Vec::with_capacity(sve.len());
    for l in 0..sve.len() {
        let symmetry = sve.symmetry(l);
        let ul = PiecewisePolynomial::new(
            full_x.clone(),
            monomial_coefficients(&sve.u[l], &sve.edges_x, sve.nl, symmetry, &tables),
        )?;
        let vl = PiecewisePolynomial::new(
            full_y.clone(),
            monomial_coefficients(&sve.v[l], &sve.edges_y, sve.nl, symmetry, &tables),
        )?;

        if ul.compute_value(1.0)? < 0.0 {
            u.push(-ul);
            v.push(-vl);
        } else {
            u.push(ul);
            v.push(vl);
        }
    }

    Ok(BasisFunctions {
        sv: sve.s.iter().map(|s| s.to_f64()).collect(),
        u,
        v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauss::normalized_legendre_p;
    use approx::assert_abs_diff_eq;

    fn single_vector(half_edges: Vec<f64>, vector: Vec<f64>, nl: usize, s: f64) -> SVEResult<f64> {
        SVEResult {
            s: vec![s],
            u: vec![Array1::from(vector.clone())],
            v: vec![Array1::from(vector)],
            edges_x: half_edges.clone(),
            edges_y: half_edges,
            nl,
        }
    }

    #[test]
    fn test_mirrored_sections() {
        assert_eq!(mirrored_sections(3, 0), (3, 2));
        assert_eq!(mirrored_sections(3, 2), (5, 0));
        assert_eq!(mirrored_sections(1, 0), (1, 0));
    }

    #[test]
    fn test_full_domain_edges() {
        let edges = full_domain_edges(&[0.0, 0.25, 1.0]);
        assert_eq!(edges, vec![-1.0, -0.25, 0.0, 0.25, 1.0]);
        assert!(edges[2].is_sign_positive());
    }

    #[test]
    fn test_single_legendre_function() {
        // c = e_j on one section [0, 1] gives P̃_j(2x - 1) √2 / √2 on [0, 1]
        let nl = 5;
        for j in 0..nl {
            let mut vector = vec![0.0; nl];
            vector[j] = 1.0;
            let basis = reconstruct_basis(&single_vector(vec![0.0, 1.0], vector, nl, 1.0)).unwrap();
            let u = &basis.u[0];
            let sign = if normalized_legendre_p(j, 1.0) < 0.0 { -1.0 } else { 1.0 };
            for &x in &[0.0, 0.1, 0.5, 0.77, 1.0] {
                let expected = sign * normalized_legendre_p(j, 2.0 * x - 1.0);
                assert_abs_diff_eq!(u.compute_value(x).unwrap(), expected, epsilon = 1e-12);
                // Even sector: mirrored copy
                assert_abs_diff_eq!(u.compute_value(-x).unwrap(), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_two_sections_and_unit_norm() {
        // Normalized vector spread across two sections of different widths
        let nl = 3;
        let edges = vec![0.0, 0.3, 1.0];
        let raw = [0.4, -0.2, 0.1, 0.7, 0.3, -0.5];
        let norm = raw.iter().map(|c| c * c).sum::<f64>().sqrt();
        let vector: Vec<f64> = raw.iter().map(|c| c / norm).collect();
        let basis = reconstruct_basis(&single_vector(edges.clone(), vector.clone(), nl, 2.0)).unwrap();
        let u = &basis.u[0];
        assert_eq!(basis.sv, vec![2.0]);
        assert_eq!(u.num_sections(), 4);

        // Direct evaluation of the Legendre expansion, scaled by 1/√2
        let direct = |x: f64| -> f64 {
            let s = if x < 0.3 { 0 } else { 1 };
            let (a, b) = (edges[s], edges[s + 1]);
            let h = b - a;
            let xi = 2.0 * (x - a) / h - 1.0;
            (0..nl)
                .map(|j| vector[s * nl + j] * (1.0 / h).sqrt() * normalized_legendre_p(j, xi))
                .sum()
        };
        let sign = if direct(1.0) < 0.0 { -1.0 } else { 1.0 };
        for &x in &[0.05, 0.2, 0.3, 0.55, 0.99] {
            assert_abs_diff_eq!(u.compute_value(x).unwrap(), sign * direct(x), epsilon = 1e-12);
        }
        assert_abs_diff_eq!(u.overlap(u).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_odd_parity_and_sign_fix() {
        let nl = 2;
        let mut sve = single_vector(vec![0.0, 1.0], vec![0.0, -1.0], nl, 1.0);
        sve.s.insert(0, 2.0);
        sve.u.insert(0, Array1::from(vec![1.0, 0.0]));
        sve.v.insert(0, Array1::from(vec![1.0, 0.0]));
        let basis = reconstruct_basis(&sve).unwrap();

        // l = 1 is odd: u(-x) = -u(x), and the sign is fixed so that u(1) > 0
        let u1 = &basis.u[1];
        assert!(u1.compute_value(1.0).unwrap() > 0.0);
        for &x in &[0.2, 0.6, 1.0] {
            assert_abs_diff_eq!(
                u1.compute_value(-x).unwrap(),
                -u1.compute_value(x).unwrap(),
                epsilon = 1e-13
            );
        }
        // v was flipped together with u
        assert!(basis.v[1].compute_value(1.0).unwrap() > 0.0);
    }
}
