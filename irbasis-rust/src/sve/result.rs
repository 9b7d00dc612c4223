//! SVE result containers

use ndarray::Array1;

use crate::kernel::SymmetryType;
use crate::numeric::CustomNumeric;
use crate::poly::PiecewisePolynomial;

/// Truncated singular value expansion in the section-wise Legendre basis
///
/// Entry l holds the l-th accepted singular triplet. Its vectors are
/// indexed `s * nl + j` (section s, Legendre degree j) on the half-domain
/// partitions `edges_x` and `edges_y`.
#[derive(Debug, Clone)]
pub struct SVEResult<T> {
    /// Singular values in non-increasing order
    pub s: Vec<T>,
    /// Left singular vectors
    pub u: Vec<Array1<T>>,
    /// Right singular vectors
    pub v: Vec<Array1<T>>,
    /// Half-domain section edges on the x axis
    pub edges_x: Vec<T>,
    /// Half-domain section edges on the y axis
    pub edges_y: Vec<T>,
    /// Legendre polynomials per section
    pub nl: usize,
}

impl<T: CustomNumeric> SVEResult<T> {
    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Symmetry sector of the l-th triplet
    ///
    /// The truncation alternates between sectors starting with the even one.
    pub fn symmetry(&self, l: usize) -> SymmetryType {
        if l % 2 == 0 {
            SymmetryType::Even
        } else {
            SymmetryType::Odd
        }
    }
}

/// Reconstructed basis: singular values with u_l(x) and v_l(y) on [-1, 1]
#[derive(Debug, Clone)]
pub struct BasisFunctions {
    pub sv: Vec<f64>,
    pub u: Vec<PiecewisePolynomial<f64>>,
    pub v: Vec<PiecewisePolynomial<f64>>,
}

impl BasisFunctions {
    pub fn len(&self) -> usize {
        self.sv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sv.is_empty()
    }
}
