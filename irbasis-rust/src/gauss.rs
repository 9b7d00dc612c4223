//! Gauss quadrature rules for numerical integration
//!
//! The integral of f(x) over [a, b] is approximated by a weighted sum:
//!
//! sum(f(xi) * wi for (xi, wi) in zip(x, w))
//!
//! where we generally have superexponential convergence for smooth f(x)
//! with the number of quadrature points. Composite rules over a partition
//! are obtained by reseating a canonical rule onto every section.
//!
//! The module also hosts the Legendre polynomial helpers used to project the
//! kernel onto per-section Legendre bases.

use crate::error::{IrError, Result};
use crate::numeric::CustomNumeric;

/// Quadrature rule for numerical integration.
///
/// Represents an approximation of an integral by a weighted sum over
/// discrete points `x` with weights `w` on the interval `[a, b]`.
#[derive(Debug, Clone)]
pub struct Rule<T> {
    /// Quadrature points, non-decreasing
    pub x: Vec<T>,
    /// Quadrature weights
    pub w: Vec<T>,
    /// Left endpoint of integration interval
    pub a: T,
    /// Right endpoint of integration interval
    pub b: T,
}

impl<T: CustomNumeric> Rule<T> {
    /// Create a new quadrature rule from points and weights.
    ///
    /// # Arguments
    /// * `x` - Quadrature points
    /// * `w` - Quadrature weights
    /// * `a` - Left endpoint
    /// * `b` - Right endpoint
    pub fn new(x: Vec<T>, w: Vec<T>, a: T, b: T) -> Result<Self> {
        if x.len() != w.len() {
            return Err(IrError::InvalidParameter(format!(
                "x and w must have the same length, got {} and {}",
                x.len(),
                w.len()
            )));
        }
        if !(a < b) {
            return Err(IrError::InvalidParameter(format!(
                "integration interval [{}, {}] is empty",
                a, b
            )));
        }
        Ok(Self { x, w, a, b })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reseat the rule to a new interval [a, b].
    ///
    /// Scales and translates the quadrature points and weights to the new interval.
    pub fn reseat(&self, a: T, b: T) -> Self {
        let scaling = (b - a) / (self.b - self.a);
        let half = T::from_f64(0.5);
        let midpoint_old = (self.b + self.a) * half;
        let midpoint_new = (b + a) * half;

        Self {
            x: self
                .x
                .iter()
                .map(|&xi| scaling * (xi - midpoint_old) + midpoint_new)
                .collect(),
            w: self.w.iter().map(|&wi| wi * scaling).collect(),
            a,
            b,
        }
    }

    /// Create a piecewise rule over multiple segments.
    ///
    /// # Arguments
    /// * `edges` - Segment boundaries (at least two, strictly increasing)
    pub fn piecewise(&self, edges: &[T]) -> Result<Self> {
        if edges.len() < 2 {
            return Err(IrError::InvalidParameter(
                "edges must have at least 2 elements".to_string(),
            ));
        }
        if let Some(i) = (1..edges.len()).find(|&i| !(edges[i] > edges[i - 1])) {
            return Err(IrError::InvalidParameter(format!(
                "edges must be sorted in ascending order (violated at index {})",
                i
            )));
        }

        let mut x = Vec::with_capacity(self.len() * (edges.len() - 1));
        let mut w = Vec::with_capacity(x.capacity());
        for pair in edges.windows(2) {
            let rule = self.reseat(pair[0], pair[1]);
            x.extend(rule.x);
            w.extend(rule.w);
        }

        Ok(Self {
            x,
            w,
            a: edges[0],
            b: edges[edges.len() - 1],
        })
    }

    /// Apply the rule to a function
    pub fn integrate<F: Fn(T) -> T>(&self, f: F) -> T {
        self.x
            .iter()
            .zip(self.w.iter())
            .fold(T::zero(), |acc, (&xi, &wi)| acc + wi * f(xi))
    }
}

/// Create a Gauss-Legendre quadrature rule with n points on [-1, 1].
///
/// Nodes are refined by Newton iteration on the three-term recurrence in
/// the working precision T, so a `Df64` rule is accurate to double-double
/// precision.
pub fn legendre<T: CustomNumeric>(n: usize) -> Rule<T> {
    let (x, w) = gauss_legendre_nodes_weights(n);
    Rule {
        x,
        w,
        a: -T::one(),
        b: T::one(),
    }
}

fn gauss_legendre_nodes_weights<T: CustomNumeric>(n: usize) -> (Vec<T>, Vec<T>) {
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut nodes = vec![T::zero(); n];
    let mut weights = vec![T::zero(); n];
    let m = n.div_ceil(2);
    let tol = T::from_f64(4.0) * T::epsilon();

    for i in 0..m {
        // Initial guess from the asymptotic node position
        let guess = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut z = T::from_f64(guess);

        // Newton's method to refine the root
        for _ in 0..100 {
            let (p, dp) = legendre_polynomial_and_derivative(n, z);
            let dz = p / dp;
            z -= dz;
            if dz.abs() <= tol * z.abs().max(T::one()) {
                break;
            }
        }
        if 2 * i + 1 == n {
            z = T::zero();
        }

        let (_, dp) = legendre_polynomial_and_derivative(n, z);
        let weight = T::from_f64(2.0) / ((T::one() - z * z) * dp * dp);

        // z is the i-th largest root
        nodes[i] = -z;
        weights[i] = weight;
        nodes[n - 1 - i] = z;
        weights[n - 1 - i] = weight;
    }

    (nodes, weights)
}

/// Legendre polynomial P_n(x) and its derivative
fn legendre_polynomial_and_derivative<T: CustomNumeric>(n: usize, x: T) -> (T, T) {
    let mut p0 = T::one();
    let mut p1 = x;
    let mut dp0 = T::zero();
    let mut dp1 = T::one();
    if n == 0 {
        return (p0, dp0);
    }

    for k in 2..=n {
        let kf = T::from_usize(k);
        let c = T::from_usize(2 * k - 1);
        let d = T::from_usize(k - 1);

        let p2 = (c * x * p1 - d * p0) / kf;
        let dp2 = (c * (p1 + x * dp1) - d * dp0) / kf;

        p0 = p1;
        p1 = p2;
        dp0 = dp1;
        dp1 = dp2;
    }

    (p1, dp1)
}

/// Legendre polynomial P_l(x)
pub fn legendre_p<T: CustomNumeric>(l: usize, x: T) -> T {
    legendre_polynomial_and_derivative(l, x).0
}

/// Normalized Legendre polynomial √(l + 1/2) P_l(x)
///
/// These are orthonormal on [-1, 1].
pub fn normalized_legendre_p<T: CustomNumeric>(l: usize, x: T) -> T {
    T::from_f64(l as f64 + 0.5).sqrt() * legendre_p(l, x)
}

/// Normalized Legendre polynomials of degree 0..nl at x
pub fn normalized_legendre_p_all<T: CustomNumeric>(nl: usize, x: T) -> Vec<T> {
    let mut values = Vec::with_capacity(nl);
    let mut p0 = T::one();
    let mut p1 = x;
    for l in 0..nl {
        let p = match l {
            0 => p0,
            1 => p1,
            _ => {
                let p2 = (T::from_usize(2 * l - 1) * x * p1 - T::from_usize(l - 1) * p0)
                    / T::from_usize(l);
                p0 = p1;
                p1 = p2;
                p2
            }
        };
        values.push(T::from_f64(l as f64 + 0.5).sqrt() * p);
    }
    values
}

/// Derivatives of the normalized Legendre polynomials at x = -1
///
/// Returns `d[l][k]` = d^k/dx^k √(l + 1/2) P_l(x) at x = -1 for
/// l, k in 0..nl. Uses P_l^(k+1)(1) / P_l^(k)(1) = (l+k+1)(l-k) / (2(k+1))
/// and P_l^(k)(-1) = (-1)^(l+k) P_l^(k)(1).
pub fn normalized_legendre_p_derivatives_at_minus_one<T: CustomNumeric>(nl: usize) -> Vec<Vec<T>> {
    (0..nl)
        .map(|l| {
            let norm = T::from_f64(l as f64 + 0.5).sqrt();
            let mut at_one = T::one();
            let mut derivs = Vec::with_capacity(nl);
            for k in 0..nl {
                let sign = if (l + k) % 2 == 0 { T::one() } else { -T::one() };
                derivs.push(sign * norm * at_one);
                if k < l {
                    at_one = at_one * T::from_usize((l + k + 1) * (l - k))
                        / T::from_usize(2 * (k + 1));
                } else {
                    at_one = T::zero();
                }
            }
            derivs
        })
        .collect()
}

#[cfg(test)]
#[path = "gauss_tests.rs"]
mod tests;
