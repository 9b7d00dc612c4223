//! # irbasis-rust: intermediate representation basis generation
//!
//! Computes the IR basis of the fermionic and bosonic analytic-continuation
//! kernels: singular values s_l, functions u_l(x) and v_l(y) as piecewise
//! polynomials on [-1, 1], and transformation matrices to Matsubara
//! frequencies.
//!
//! ```no_run
//! use irbasis_rust::IrBasisSet;
//!
//! let basis = IrBasisSet::fermionic(100.0, 50, 1e-10, 10)?;
//! let u0 = basis.ulx(0, 0.5)?;
//! let tnl = basis.compute_tnl(&[0, 1, 10])?;
//! # Ok::<(), irbasis_rust::IrError>(())
//! ```

pub mod basis;
pub mod error;
pub mod gauss;
pub mod kernel;
pub mod kernelmatrix;
pub mod numeric;
pub mod poly;
pub mod polyfourier;
pub mod spline;
pub mod sve;
pub mod traits;

// Re-export commonly used types and traits
pub use basis::IrBasisSet;
pub use error::{IrError, Result};
pub use gauss::{Rule, legendre};
pub use kernel::{BosonicKernel, FermionicKernel, Kernel, SymmetryType};
pub use kernelmatrix::{even_odd_matrices, matrix_from_gauss, matrix_rep};
pub use numeric::{CustomNumeric, Df64};
pub use poly::{PiecewisePolynomial, orthonormalize};
pub use polyfourier::{compute_tbar_ol, compute_tnl};
pub use spline::{SplineBoundary, construct_piecewise_polynomial_cspline};
pub use sve::{
    BasisFunctions, IrBasisConfig, SVEResult, TworkType, approximate_section_edges,
    generate_ir_basis, generate_ir_basis_with_sections,
};
pub use traits::Statistics;
