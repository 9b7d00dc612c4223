use super::*;
use crate::kernel::FermionicKernel;
use crate::numeric::Df64;
use approx::assert_abs_diff_eq;
use xprec_svd::{Precision, jacobi_svd};

#[test]
fn test_constant_function_projection() {
    // f = 1 projects onto l = 0 only, with coefficient √(h_x h_y)
    let edges_x = [0.0, 0.5, 1.0];
    let edges_y = [0.0, 0.25, 1.0];
    let nl = 4;
    let m = matrix_rep(|_, _| 1.0, &edges_x, &edges_y, 6, nl).unwrap();
    assert_eq!(m.dim(), (2 * nl, 2 * nl));

    for s in 0..2 {
        for s2 in 0..2 {
            let hx = edges_x[s + 1] - edges_x[s];
            let hy = edges_y[s2 + 1] - edges_y[s2];
            for l in 0..nl {
                for l2 in 0..nl {
                    let expected = if l == 0 && l2 == 0 { (hx * hy).sqrt() } else { 0.0 };
                    assert_abs_diff_eq!(m[[nl * s + l, nl * s2 + l2]], expected, epsilon = 1e-14);
                }
            }
        }
    }
}

#[test]
fn test_separable_function() {
    // f(x, y) = x y on a single section is rank one with singular value ∫x^2 = 1/3
    let m = matrix_rep(|x: f64, y: f64| x * y, &[0.0, 1.0], &[0.0, 1.0], 8, 5).unwrap();
    let svd = jacobi_svd(&m).unwrap();
    assert_abs_diff_eq!(svd.s[0], 1.0 / 3.0, epsilon = 1e-14);
    assert_abs_diff_eq!(svd.s[1], 0.0, epsilon = 1e-14);
}

#[test]
fn test_frobenius_norm_matches_integral() {
    // ‖M‖_F^2 = ∫∫ f^2 once f is resolved by the basis
    let f = |x: f64, y: f64| (x * y).exp();
    let m = matrix_rep(f, &[0.0, 0.4, 1.0], &[0.0, 0.6, 1.0], 16, 12).unwrap();
    let frob2: f64 = m.iter().map(|v| v * v).sum();

    let rule = legendre::<f64>(30).reseat(0.0, 1.0);
    let reference = rule.integrate(|x| rule.integrate(|y| f(x, y) * f(x, y)));
    assert_abs_diff_eq!(frob2, reference, epsilon = 1e-12);
}

#[test]
fn test_even_odd_matrices_singular_values() {
    // The sectors carry the even and odd singular values of the full kernel
    let kernel = FermionicKernel::new(10.0).unwrap();
    let edges = [0.0, 0.5, 1.0];
    let (even, odd) = even_odd_matrices::<f64, _>(&kernel, &edges, &edges, 12, 10).unwrap();
    let s_even = jacobi_svd(&even).unwrap().s;
    let s_odd = jacobi_svd(&odd).unwrap().s;

    let full_edges = [-1.0, -0.5, 0.0, 0.5, 1.0];
    let full = matrix_rep(|x, y| kernel.evaluate(x, y), &full_edges, &full_edges, 12, 10).unwrap();
    let s_full = jacobi_svd(&full).unwrap().s;

    // Each half-domain sector value appears in the full spectrum scaled by 1/√2 * √2 = 1
    assert_abs_diff_eq!(s_full[0], s_even[0], epsilon = 1e-12 * s_full[0]);
    assert_abs_diff_eq!(s_full[1], s_odd[0], epsilon = 1e-12 * s_full[0]);
    assert_abs_diff_eq!(s_full[2], s_even[1], epsilon = 1e-12 * s_full[0]);
}

#[test]
fn test_matrix_rep_df64_agrees_with_f64() {
    let kernel = FermionicKernel::new(5.0).unwrap();
    let edges64 = [0.0, 0.3, 1.0];
    let edges_dd: Vec<Df64> = edges64.iter().map(|&e| Df64::from(e)).collect();
    let (even64, _) = even_odd_matrices::<f64, _>(&kernel, &edges64, &edges64, 8, 6).unwrap();
    let (even_dd, _) = even_odd_matrices::<Df64, _>(&kernel, &edges_dd, &edges_dd, 8, 6).unwrap();
    for (a, b) in even64.iter().zip(even_dd.iter()) {
        assert_abs_diff_eq!(*a, b.to_f64(), epsilon = 1e-14);
    }
}

#[test]
fn test_matrix_from_gauss() {
    let kernel = FermionicKernel::new(1.0).unwrap();
    let rule = legendre::<f64>(40).reseat(0.0, 1.0);
    let m = matrix_from_gauss(&kernel, &rule, &rule, SymmetryType::Even);
    let frob2: f64 = m.iter().map(|v| v * v).sum();
    let reference = rule.integrate(|x| rule.integrate(|y| kernel.even_part(x, y).powi(2)));
    assert_abs_diff_eq!(frob2, reference, epsilon = 1e-14);
}

#[test]
fn test_invalid_arguments() {
    assert!(matrix_rep(|_, _| 1.0, &[0.0, 1.0], &[0.0, 1.0], 4, 0).is_err());
    assert!(matrix_rep(|_, _| 1.0, &[1.0, 0.0], &[0.0, 1.0], 4, 2).is_err());
}
