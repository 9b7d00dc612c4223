//! Singular Value Expansion (SVE) module
//!
//! This module turns a kernel into its IR basis:
//!
//! 1. section edges on [0, 1] from a coarse expansion ([`approximate_section_edges`]),
//! 2. even and odd sector matrices in the section-wise Legendre basis,
//! 3. one-sided Jacobi SVD of both sectors in the working precision,
//! 4. interleaved truncation ([`truncate`]),
//! 5. reconstruction of u_l and v_l as piecewise polynomials on [-1, 1].

mod compute;
mod reconstruct;
mod result;
mod sections;
mod types;

pub use compute::{
    IrBasisConfig, compute_sector_svds, compute_sve, generate_ir_basis,
    generate_ir_basis_with_sections, truncate,
};
pub use reconstruct::{full_domain_edges, mirrored_sections, reconstruct_basis};
pub use result::{BasisFunctions, SVEResult};
pub use sections::{SECTION_CUTOFF, approximate_section_edges};
pub use types::{TworkType, choose_twork, required_bits};
