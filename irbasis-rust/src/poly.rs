//! Piecewise polynomial functions
//!
//! A `PiecewisePolynomial` stores, for every section `[x_s, x_{s+1}]`, the
//! coefficients of the local monomial expansion
//!
//! ```text
//! f(x) = sum_p c[s, p] * (x - x_s)^p
//! ```
//!
//! All basis functions, v functions and fitted test functions of this crate
//! use this representation. Inner products are computed in closed form, so
//! `overlap` is exact up to rounding.

use ndarray::Array2;
use std::ops::{Mul, Neg};

use crate::error::{IrError, Result};
use crate::numeric::CustomNumeric;

/// Piecewise polynomial on a partition of `[xmin, xmax]`
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomial<T = f64> {
    /// Section edges, strictly increasing
    edges: Vec<T>,
    /// Local monomial coefficients, shape (n_sections, order + 1)
    coeffs: Array2<T>,
}

impl<T: CustomNumeric> PiecewisePolynomial<T> {
    /// Create a new piecewise polynomial
    ///
    /// # Arguments
    /// * `edges` - Section edges (at least two, strictly increasing)
    /// * `coeffs` - Coefficients; row `s` is the expansion about `edges[s]`
    ///
    /// # Returns
    /// `IrError::InvalidParameter` if the edges are not strictly increasing,
    /// contain a non-finite value or do not match the number of rows.
    pub fn new(edges: Vec<T>, coeffs: Array2<T>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(IrError::InvalidParameter(format!(
                "a piecewise polynomial needs at least 2 section edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(IrError::InvalidParameter(
                "section edges must be finite".to_string(),
            ));
        }
        if let Some(i) = (1..edges.len()).find(|&i| edges[i] <= edges[i - 1]) {
            return Err(IrError::InvalidParameter(format!(
                "section edges must be strictly increasing (violated at index {})",
                i
            )));
        }
        if coeffs.nrows() != edges.len() - 1 || coeffs.ncols() == 0 {
            return Err(IrError::InvalidParameter(format!(
                "coefficient matrix has shape {:?}, expected ({}, k + 1)",
                coeffs.dim(),
                edges.len() - 1
            )));
        }
        Ok(Self { edges, coeffs })
    }

    /// Zero function of the given order on the given partition
    pub fn zeros(edges: Vec<T>, order: usize) -> Result<Self> {
        let ns = edges.len().saturating_sub(1);
        Self::new(edges, Array2::from_elem((ns, order + 1), T::zero()))
    }

    pub fn num_sections(&self) -> usize {
        self.coeffs.nrows()
    }

    /// Polynomial order k (every section has k + 1 coefficients)
    pub fn order(&self) -> usize {
        self.coeffs.ncols() - 1
    }

    pub fn section_edges(&self) -> &[T] {
        &self.edges
    }

    pub fn section_edge(&self, i: usize) -> Result<T> {
        self.edges.get(i).copied().ok_or(IrError::IndexOutOfRange {
            index: i,
            size: self.edges.len(),
        })
    }

    pub fn coefficients(&self) -> &Array2<T> {
        &self.coeffs
    }

    /// Coefficient of (x - x_s)^p in section s
    pub fn coefficient(&self, s: usize, p: usize) -> Result<T> {
        self.coeffs.get((s, p)).copied().ok_or(IrError::IndexOutOfRange {
            index: s * self.coeffs.ncols() + p,
            size: self.coeffs.len(),
        })
    }

    pub fn xmin(&self) -> T {
        self.edges[0]
    }

    pub fn xmax(&self) -> T {
        self.edges[self.edges.len() - 1]
    }

    /// Index of the section containing x
    ///
    /// Interior edges belong to the section on their right; `xmax` belongs
    /// to the last section.
    pub fn find_section(&self, x: T) -> Result<usize> {
        if !(x >= self.xmin() && x <= self.xmax()) {
            return Err(IrError::DomainError {
                x: x.to_f64(),
                min: self.xmin().to_f64(),
                max: self.xmax().to_f64(),
            });
        }
        let interior = &self.edges[1..self.edges.len() - 1];
        Ok(interior.partition_point(|&e| e <= x))
    }

    /// Evaluate the function at x
    pub fn compute_value(&self, x: T) -> Result<T> {
        let s = self.find_section(x)?;
        Ok(self.evaluate_section(s, x - self.edges[s]))
    }

    /// Horner evaluation of section s at local coordinate dx
    pub(crate) fn evaluate_section(&self, s: usize, dx: T) -> T {
        let row = self.coeffs.row(s);
        row.iter().rev().fold(T::zero(), |acc, &c| acc * dx + c)
    }

    /// Coefficients of section s re-expanded about x_s + delta
    fn shifted_coefficients(&self, s: usize, delta: T) -> Vec<T> {
        let mut c: Vec<T> = self.coeffs.row(s).to_vec();
        if delta == T::zero() {
            return c;
        }
        // Repeated synthetic division (Taylor shift)
        let n = c.len();
        for j in 0..n {
            for i in (j..n - 1).rev() {
                let upper = c[i + 1];
                c[i] += delta * upper;
            }
        }
        c
    }

    fn edge_tolerance(&self) -> T {
        let scale = self.xmin().abs().max(self.xmax().abs()).max(self.xmax() - self.xmin());
        T::from_f64(16.0) * T::epsilon() * scale
    }

    fn same_partition(&self, other: &Self) -> bool {
        let tol = self.edge_tolerance();
        self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .zip(other.edges.iter())
                .all(|(&a, &b)| (a - b).abs() <= tol)
    }

    /// Exact integral of the product of two piecewise polynomials
    ///
    /// The two partitions may differ; the product is integrated on the union
    /// of their edges. Both functions must cover the same domain.
    pub fn overlap(&self, other: &Self) -> Result<T> {
        let tol = self.edge_tolerance();
        if (self.xmin() - other.xmin()).abs() > tol || (self.xmax() - other.xmax()).abs() > tol {
            return Err(IrError::SectionMismatch(format!(
                "domains [{}, {}] and [{}, {}] differ",
                self.xmin(),
                self.xmax(),
                other.xmin(),
                other.xmax()
            )));
        }

        let refined = if self.same_partition(other) {
            self.edges.clone()
        } else {
            merge_edges(&self.edges, &other.edges, tol)
        };

        let mut total = T::zero();
        for w in refined.windows(2) {
            let (a, b) = (w[0], w[1]);
            let h = b - a;
            let mid = (a + b) / T::from_f64(2.0);
            let s1 = self.find_section(mid)?;
            let s2 = other.find_section(mid)?;
            let c = self.shifted_coefficients(s1, a - self.edges[s1]);
            let d = other.shifted_coefficients(s2, a - other.edges[s2]);
            total += integrate_product(&c, &d, h);
        }
        Ok(total)
    }

    /// Squared L2 norm, `overlap(self, self)`
    pub fn squared_norm(&self) -> Result<T> {
        self.overlap(self)
    }

    fn combine(&self, other: &Self, sign: T) -> Result<Self> {
        if !self.same_partition(other) {
            return Err(IrError::SectionMismatch(format!(
                "{} sections vs {} sections with different edges",
                self.num_sections(),
                other.num_sections()
            )));
        }
        let ncols = self.coeffs.ncols().max(other.coeffs.ncols());
        let coeffs = Array2::from_shape_fn((self.num_sections(), ncols), |(s, p)| {
            let a = self.coeffs.get((s, p)).copied().unwrap_or(T::zero());
            let b = other.coeffs.get((s, p)).copied().unwrap_or(T::zero());
            a + sign * b
        });
        Ok(Self {
            edges: self.edges.clone(),
            coeffs,
        })
    }

    /// Sum of two functions on the same partition
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.combine(other, T::one())
    }

    /// Difference of two functions on the same partition
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.combine(other, -T::one())
    }

    /// Multiply by a scalar
    pub fn scale(&self, factor: T) -> Self {
        Self {
            edges: self.edges.clone(),
            coeffs: self.coeffs.mapv(|c| c * factor),
        }
    }

    /// Round to a double-precision function
    pub fn to_f64(&self) -> PiecewisePolynomial<f64> {
        PiecewisePolynomial {
            edges: self.edges.iter().map(|e| e.to_f64()).collect(),
            coeffs: self.coeffs.mapv(|c| c.to_f64()),
        }
    }
}

/// Union of two sorted edge lists; edges closer than `tol` are merged
fn merge_edges<T: CustomNumeric>(a: &[T], b: &[T], tol: T) -> Vec<T> {
    let mut all: Vec<T> = a.iter().chain(b.iter()).copied().collect();
    all.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    let mut merged: Vec<T> = Vec::with_capacity(all.len());
    for e in all {
        match merged.last() {
            Some(&last) if e - last <= tol => {}
            _ => merged.push(e),
        }
    }
    merged
}

/// ∫_0^h (Σ c_a t^a)(Σ d_b t^b) dt
fn integrate_product<T: CustomNumeric>(c: &[T], d: &[T], h: T) -> T {
    let n = c.len() + d.len() - 1;
    // h^(m+1) / (m+1) for m = a + b
    let mut moments = Vec::with_capacity(n);
    let mut hp = h;
    for m in 0..n {
        moments.push(hp / T::from_usize(m + 1));
        hp *= h;
    }
    let mut sum = T::zero();
    for (a, &ca) in c.iter().enumerate() {
        for (b, &db) in d.iter().enumerate() {
            sum += ca * db * moments[a + b];
        }
    }
    sum
}

impl<T: CustomNumeric> Mul<T> for PiecewisePolynomial<T> {
    type Output = PiecewisePolynomial<T>;

    fn mul(mut self, rhs: T) -> Self::Output {
        self.coeffs.mapv_inplace(|c| c * rhs);
        self
    }
}

impl<T: CustomNumeric> Mul<T> for &PiecewisePolynomial<T> {
    type Output = PiecewisePolynomial<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<PiecewisePolynomial<f64>> for f64 {
    type Output = PiecewisePolynomial<f64>;

    fn mul(self, rhs: PiecewisePolynomial<f64>) -> Self::Output {
        rhs * self
    }
}

impl<T: CustomNumeric> Neg for PiecewisePolynomial<T> {
    type Output = PiecewisePolynomial<T>;

    fn neg(mut self) -> Self::Output {
        self.coeffs.mapv_inplace(|c| -c);
        self
    }
}

/// Orthonormalize a set of functions in place (modified Gram-Schmidt)
///
/// Functions are processed in input order, so of two dependent functions
/// the earlier one is kept. All functions must share one partition.
///
/// # Returns
/// `IrError::LinearlyDependent` with the offending index when the residual
/// of a function falls below √ε of its original norm. The input is left
/// untouched on error.
pub fn orthonormalize<T: CustomNumeric>(functions: &mut [PiecewisePolynomial<T>]) -> Result<()> {
    let mut basis: Vec<PiecewisePolynomial<T>> = Vec::with_capacity(functions.len());
    for (i, f) in functions.iter().enumerate() {
        let original = f.squared_norm()?;
        let mut residual = f.clone();
        for prev in &basis {
            let proj = prev.overlap(&residual)?;
            residual = residual.checked_sub(&prev.scale(proj))?;
        }
        let norm2 = residual.squared_norm()?;
        if !(norm2 > T::epsilon() * original) {
            return Err(IrError::LinearlyDependent { index: i });
        }
        basis.push(residual * (T::one() / norm2.sqrt()));
    }
    functions.clone_from_slice(&basis);
    Ok(())
}

#[cfg(test)]
#[path = "poly_tests.rs"]
mod tests;
