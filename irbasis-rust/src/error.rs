//! Error type of the basis construction and evaluation

use xprec_svd::SVDError;

/// Errors reported by this crate
///
/// Configuration errors come from caller input and are never coerced.
/// Numerical-consistency errors mean the precision or the cutoff is not
/// adequate for the requested basis; the caller has to adjust and retry.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    #[error("Index {index} is out of range for a basis of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Argument {x} is outside the domain [{min}, {max}]")]
    DomainError { x: f64, min: f64, max: f64 },

    #[error("Section partitions do not match: {0}")]
    SectionMismatch(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid frequency indices: {0}")]
    InvalidFrequencyIndex(String),

    #[error("Basis is empty")]
    EmptyBasis,

    #[error(
        "Singular values are not in decreasing order at index {index}. \
         This may be due to numerical round-off errors; ask for fewer basis functions"
    )]
    SingularValuesNotDecreasing { index: usize },

    #[error("Function {index} is linearly dependent on the preceding functions")]
    LinearlyDependent { index: usize },

    #[error("SVD failed: {0}")]
    Svd(#[from] SVDError),
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IrError::IndexOutOfRange { index: 5, size: 3 };
        assert_eq!(err.to_string(), "Index 5 is out of range for a basis of size 3");

        let err = IrError::DomainError { x: 1.5, min: -1.0, max: 1.0 };
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_svd_error_conversion() {
        fn fails() -> Result<()> {
            Err(SVDError::EmptyMatrix)?
        }
        assert!(matches!(fails(), Err(IrError::Svd(SVDError::EmptyMatrix))));
    }
}
