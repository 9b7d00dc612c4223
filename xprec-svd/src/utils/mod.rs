//! Utility functions for SVD computations

pub mod norms;
pub mod validation;

pub use norms::{norm_2, norm_frobenius, norm_inf, norm_max};
pub use validation::{reconstruction_error, validate_svd};
