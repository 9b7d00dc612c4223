//! IR basis set
//!
//! This module provides the `IrBasisSet` type, the query surface over a
//! generated (or loaded) IR basis: singular values s_l, functions u_l(x) on
//! the imaginary-time side, v_l(y) on the real-frequency side, and the
//! transformation matrices to Matsubara frequencies.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{IrError, Result};
use crate::kernel::{BosonicKernel, FermionicKernel, Kernel};
use crate::poly::PiecewisePolynomial;
use crate::polyfourier::{DEFAULT_QUADRATURE_ORDER, compute_tbar_ol, compute_tnl};
use crate::sve::{BasisFunctions, IrBasisConfig, generate_ir_basis};
use crate::traits::Statistics;

/// IR basis of an analytic-continuation kernel
///
/// In reduced variables x = 2τ/β - 1 and y = ω/ωmax the kernel is expanded as
///
/// ```text
/// K(x, y) ≈ sum(u[l](x) * s[l] * v[l](y) for l in 0..dim)
/// ```
///
/// u_l and v_l are even for even l and odd for odd l. The set is immutable
/// and can be shared between threads.
#[derive(Debug, Clone)]
pub struct IrBasisSet {
    statistics: Statistics,
    /// Kernel cutoff, unknown for bases loaded from parts
    lambda: Option<f64>,
    sv: Vec<f64>,
    u: Vec<PiecewisePolynomial<f64>>,
    v: Vec<PiecewisePolynomial<f64>>,
    quadrature_order: usize,
}

impl IrBasisSet {
    /// Generate the basis of a kernel
    pub fn new<K: Kernel>(kernel: &K, config: &IrBasisConfig) -> Result<Self> {
        let BasisFunctions { sv, u, v } = generate_ir_basis(kernel, config)?;
        if sv.is_empty() {
            return Err(IrError::EmptyBasis);
        }
        Ok(Self {
            statistics: kernel.statistics(),
            lambda: Some(kernel.lambda()),
            sv,
            u,
            v,
            quadrature_order: config.quadrature_order,
        })
    }

    /// Fermionic basis with default quadrature and section parameters
    ///
    /// # Arguments
    /// * `lambda` - Kernel cutoff Λ = β ωmax
    /// * `max_dim` - Maximum number of basis functions
    /// * `cutoff` - Relative singular value cutoff
    /// * `nl` - Legendre polynomials per section
    pub fn fermionic(lambda: f64, max_dim: usize, cutoff: f64, nl: usize) -> Result<Self> {
        let kernel = FermionicKernel::new(lambda)?;
        Self::new(&kernel, &IrBasisConfig::new(max_dim).with_cutoff(cutoff).with_nl(nl))
    }

    /// Bosonic basis with default quadrature and section parameters
    ///
    /// Arguments as for [`IrBasisSet::fermionic`].
    pub fn bosonic(lambda: f64, max_dim: usize, cutoff: f64, nl: usize) -> Result<Self> {
        let kernel = BosonicKernel::new(lambda)?;
        Self::new(&kernel, &IrBasisConfig::new(max_dim).with_cutoff(cutoff).with_nl(nl))
    }

    /// Assemble a basis from precomputed parts, e.g. one loaded from disk
    ///
    /// # Returns
    /// An error unless the parts are non-empty and of equal length, `sv` is
    /// finite and non-increasing and every function covers [-1, 1].
    pub fn from_parts(
        statistics: Statistics,
        sv: Vec<f64>,
        u: Vec<PiecewisePolynomial<f64>>,
        v: Vec<PiecewisePolynomial<f64>>,
    ) -> Result<Self> {
        if sv.is_empty() {
            return Err(IrError::EmptyBasis);
        }
        if u.len() != sv.len() || v.len() != sv.len() {
            return Err(IrError::InvalidParameter(format!(
                "{} singular values but {} u and {} v functions",
                sv.len(),
                u.len(),
                v.len()
            )));
        }
        if let Some(l) = sv.iter().position(|s| !s.is_finite()) {
            return Err(IrError::InvalidParameter(format!(
                "singular value {} is not finite: {}",
                l, sv[l]
            )));
        }
        if let Some(l) = (1..sv.len()).find(|&l| sv[l - 1] < sv[l]) {
            return Err(IrError::SingularValuesNotDecreasing { index: l });
        }
        if let Some(f) = u.iter().chain(v.iter()).find(|f| f.xmin() > -1.0 || f.xmax() < 1.0) {
            return Err(IrError::SectionMismatch(format!(
                "basis functions must cover [-1, 1], got [{}, {}]",
                f.xmin(),
                f.xmax()
            )));
        }
        Ok(Self {
            statistics,
            lambda: None,
            sv,
            u,
            v,
            quadrature_order: DEFAULT_QUADRATURE_ORDER,
        })
    }

    /// Number of basis functions
    pub fn dim(&self) -> usize {
        self.sv.len()
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Kernel cutoff Λ, if the basis was generated here
    pub fn lambda(&self) -> Option<f64> {
        self.lambda
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.sv
    }

    fn check_index(&self, l: usize) -> Result<()> {
        if l >= self.dim() {
            return Err(IrError::IndexOutOfRange {
                index: l,
                size: self.dim(),
            });
        }
        Ok(())
    }

    /// Singular value s_l
    pub fn sl(&self, l: usize) -> Result<f64> {
        self.check_index(l)?;
        Ok(self.sv[l])
    }

    /// Value of u_l at x ∈ [-1, 1]
    pub fn ulx(&self, l: usize, x: f64) -> Result<f64> {
        self.check_index(l)?;
        evaluate_with_parity(&self.u[l], l, x)
    }

    /// Value of v_l at y ∈ [-1, 1]
    pub fn vly(&self, l: usize, y: f64) -> Result<f64> {
        self.check_index(l)?;
        evaluate_with_parity(&self.v[l], l, y)
    }

    /// u_l as a piecewise polynomial
    pub fn ul(&self, l: usize) -> Result<&PiecewisePolynomial<f64>> {
        self.check_index(l)?;
        Ok(&self.u[l])
    }

    /// v_l as a piecewise polynomial
    pub fn vl(&self, l: usize) -> Result<&PiecewisePolynomial<f64>> {
        self.check_index(l)?;
        Ok(&self.v[l])
    }

    /// Transformation matrix to Matsubara frequencies
    ///
    /// The computation may take some time; store the result rather than
    /// calling this repeatedly.
    ///
    /// # Arguments
    /// * `n_indices` - Non-negative Matsubara indices in ascending order
    ///
    /// # Returns
    /// Matrix of shape `(n_indices.len(), dim())`
    pub fn compute_tnl(&self, n_indices: &[i64]) -> Result<Array2<Complex64>> {
        compute_tnl(n_indices, self.statistics, &self.u, self.quadrature_order)
    }

    /// Transformation matrix in the shifted representation, o ≥ 0 ascending
    pub fn compute_tbar_ol(&self, o_indices: &[i64]) -> Result<Array2<Complex64>> {
        compute_tbar_ol(o_indices, &self.u, self.quadrature_order)
    }
}

/// Evaluate f_l at x, going through |x| and the parity (-1)^l
fn evaluate_with_parity(f: &PiecewisePolynomial<f64>, l: usize, x: f64) -> Result<f64> {
    if !(-1.0..=1.0).contains(&x) {
        return Err(IrError::DomainError {
            x,
            min: -1.0,
            max: 1.0,
        });
    }
    if x >= 0.0 {
        f.compute_value(x)
    } else {
        let sign = if l % 2 == 0 { 1.0 } else { -1.0 };
        Ok(sign * f.compute_value(-x)?)
    }
}

#[cfg(test)]
#[path = "basis_tests.rs"]
mod tests;
