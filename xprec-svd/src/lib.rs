//! # xprec-svd: Extended-Precision Jacobi SVD
//!
//! One-sided Jacobi SVD generic over the working precision, so the same
//! routine runs in `f64` and in double-double (`Df64`) arithmetic.
//!
//! ```
//! use ndarray::array;
//! use xprec_svd::{jacobi_svd, Df64};
//!
//! let a = array![[Df64::from(2.0), Df64::from(0.0)], [Df64::from(0.0), Df64::from(1.0)]];
//! let svd = jacobi_svd(&a).unwrap();
//! assert_eq!(svd.s[0].hi(), 2.0);
//! ```

pub mod precision;
pub mod svd;
pub mod utils;

pub use precision::{Df64, Precision};
pub use svd::{JacobiConfig, SVDError, SVDResult, jacobi_svd, jacobi_svd_with_config};
pub use utils::{norm_2, norm_frobenius, norm_inf, norm_max, reconstruction_error, validate_svd};
