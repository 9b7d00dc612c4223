//! Cubic spline interpolation packaged as a piecewise polynomial
//!
//! Used to bring tabulated functions (for example G(τ) on a grid) into the
//! representation of the basis functions so that they can be expanded with
//! `overlap`.

use ndarray::Array2;

use crate::error::{IrError, Result};
use crate::poly::PiecewisePolynomial;

/// Boundary condition of a cubic spline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplineBoundary {
    /// Vanishing second derivative at both ends
    Natural,
    /// Prescribed first derivative at both ends
    Clamped { left: f64, right: f64 },
}

/// Construct a cubic spline through `(x[i], y[i])`
///
/// # Arguments
/// * `x` - Knots, strictly increasing (at least two)
/// * `y` - Values at the knots
/// * `boundary` - Boundary condition
///
/// # Returns
/// An order-3 `PiecewisePolynomial` whose sections are the knot intervals.
pub fn construct_piecewise_polynomial_cspline(
    x: &[f64],
    y: &[f64],
    boundary: SplineBoundary,
) -> Result<PiecewisePolynomial<f64>> {
    if x.len() != y.len() {
        return Err(IrError::InvalidParameter(format!(
            "x and y must have equal length, got {} and {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(IrError::InvalidParameter(
            "a cubic spline needs at least 2 knots".to_string(),
        ));
    }
    if let Some(i) = (1..x.len()).find(|&i| !(x[i] > x[i - 1])) {
        return Err(IrError::InvalidParameter(format!(
            "knots must be strictly increasing (violated at index {})",
            i
        )));
    }

    let y2 = second_derivatives(x, y, boundary);

    let n = x.len();
    let coeffs = Array2::from_shape_fn((n - 1, 4), |(i, p)| {
        let h = x[i + 1] - x[i];
        match p {
            0 => y[i],
            1 => (y[i + 1] - y[i]) / h - h * (2.0 * y2[i] + y2[i + 1]) / 6.0,
            2 => 0.5 * y2[i],
            _ => (y2[i + 1] - y2[i]) / (6.0 * h),
        }
    });

    PiecewisePolynomial::new(x.to_vec(), coeffs)
}

/// Second derivatives at the knots (tridiagonal sweep)
fn second_derivatives(x: &[f64], y: &[f64], boundary: SplineBoundary) -> Vec<f64> {
    let n = x.len();
    let mut y2 = vec![0.0; n];
    let mut u = vec![0.0; n];

    if let SplineBoundary::Clamped { left, .. } = boundary {
        let h = x[1] - x[0];
        y2[0] = -0.5;
        u[0] = (3.0 / h) * ((y[1] - y[0]) / h - left);
    }

    // Forward sweep
    for i in 1..n - 1 {
        let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        let slope_diff = (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
        u[i] = (6.0 * slope_diff / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
    }

    let (qn, un) = match boundary {
        SplineBoundary::Natural => (0.0, 0.0),
        SplineBoundary::Clamped { right, .. } => {
            let h = x[n - 1] - x[n - 2];
            (0.5, (3.0 / h) * (right - (y[n - 1] - y[n - 2]) / h))
        }
    };
    y2[n - 1] = (un - qn * u[n - 2]) / (qn * y2[n - 2] + 1.0);

    // Back substitution
    for k in (0..n - 1).rev() {
        y2[k] = y2[k] * y2[k + 1] + u[k];
    }
    y2
}
