//! SVD decomposition algorithms

pub mod jacobi;

pub use jacobi::{JacobiConfig, SVDError, SVDResult, jacobi_svd, jacobi_svd_with_config};
