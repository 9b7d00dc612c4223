//! Analytic-continuation kernels
//!
//! The kernels relate a spectral function on the real axis to the
//! imaginary-time Green's function, in reduced variables
//! x = 2τ/β - 1 ∈ [-1, 1] and y = ω/ωmax ∈ [-1, 1]:
//!
//! ```text
//! G(x) = -∫ K(x, y) ρ(y) dy
//! ```
//!
//! Both kernels are centrosymmetric, K(-x, -y) = K(x, y), so that the
//! singular value expansion splits into an even and an odd sector on the
//! half domain [0, 1] x [0, 1].

use crate::error::{IrError, Result};
use crate::numeric::CustomNumeric;
use crate::traits::Statistics;

/// |Λy| beyond which the hyperbolic denominator is replaced by its
/// dominant exponential
const ASYMPTOTIC_LIMIT: f64 = 200.0;

/// |Λy| below which the bosonic kernel takes its y → 0 limit
const BOSONIC_ZERO_LIMIT: f64 = 1e-30;

/// Symmetry sector of a centrosymmetric kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryType {
    /// K(x, y) + K(x, -y)
    Even,
    /// K(x, y) - K(x, -y)
    Odd,
}

impl SymmetryType {
    pub fn sign(self) -> i32 {
        match self {
            SymmetryType::Even => 1,
            SymmetryType::Odd => -1,
        }
    }
}

/// Analytic-continuation kernel on [-1, 1] x [-1, 1]
pub trait Kernel: Send + Sync {
    /// Compute K(x, y) in the working precision T
    fn evaluate<T: CustomNumeric>(&self, x: T, y: T) -> T;

    /// Statistics of the kernel
    fn statistics(&self) -> Statistics;

    /// Get the cutoff parameter Λ (lambda)
    fn lambda(&self) -> f64;

    /// Kernel restricted to one symmetry sector, K(x, y) ± K(x, -y)
    fn compute_reduced<T: CustomNumeric>(&self, x: T, y: T, symmetry: SymmetryType) -> T {
        match symmetry {
            SymmetryType::Even => self.evaluate(x, y) + self.evaluate(x, -y),
            SymmetryType::Odd => self.evaluate(x, y) - self.evaluate(x, -y),
        }
    }

    /// K(x, y) + K(x, -y)
    fn even_part<T: CustomNumeric>(&self, x: T, y: T) -> T {
        self.compute_reduced(x, y, SymmetryType::Even)
    }

    /// K(x, y) - K(x, -y)
    fn odd_part<T: CustomNumeric>(&self, x: T, y: T) -> T {
        self.compute_reduced(x, y, SymmetryType::Odd)
    }
}

fn validate_lambda(lambda: f64) -> Result<f64> {
    if !(lambda.is_finite() && lambda > 0.0) {
        return Err(IrError::InvalidParameter(format!(
            "kernel cutoff lambda must be positive and finite, got {}",
            lambda
        )));
    }
    Ok(lambda)
}

/// Fermionic kernel
///
/// K(x, y) = exp(-Λxy/2) / (2 cosh(Λy/2))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FermionicKernel {
    lambda: f64,
}

impl FermionicKernel {
    /// Create a new fermionic kernel
    ///
    /// # Returns
    /// `IrError::InvalidParameter` unless lambda is positive and finite.
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self {
            lambda: validate_lambda(lambda)?,
        })
    }
}

impl Kernel for FermionicKernel {
    fn evaluate<T: CustomNumeric>(&self, x: T, y: T) -> T {
        let half_lambda = T::from_f64(0.5 * self.lambda);
        let lambda_y = self.lambda * y.to_f64();

        if lambda_y > ASYMPTOTIC_LIMIT {
            (-half_lambda * x * y - half_lambda * y).exp()
        } else if lambda_y < -ASYMPTOTIC_LIMIT {
            (-half_lambda * x * y + half_lambda * y).exp()
        } else {
            (-half_lambda * x * y).exp() / (T::from_f64(2.0) * (half_lambda * y).cosh())
        }
    }

    fn statistics(&self) -> Statistics {
        Statistics::Fermionic
    }

    fn lambda(&self) -> f64 {
        self.lambda
    }
}

/// Bosonic kernel
///
/// K(x, y) = y exp(-Λxy/2) / (2 sinh(Λy/2))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BosonicKernel {
    lambda: f64,
}

impl BosonicKernel {
    /// Create a new bosonic kernel
    ///
    /// # Returns
    /// `IrError::InvalidParameter` unless lambda is positive and finite.
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self {
            lambda: validate_lambda(lambda)?,
        })
    }
}

impl Kernel for BosonicKernel {
    fn evaluate<T: CustomNumeric>(&self, x: T, y: T) -> T {
        let half_lambda = T::from_f64(0.5 * self.lambda);
        let lambda_y = self.lambda * y.to_f64();

        if lambda_y.abs() < BOSONIC_ZERO_LIMIT {
            // sinh(z)/z -> 1
            (-half_lambda * x * y).exp() / T::from_f64(self.lambda)
        } else if lambda_y > ASYMPTOTIC_LIMIT {
            y * (-half_lambda * x * y - half_lambda * y).exp()
        } else if lambda_y < -ASYMPTOTIC_LIMIT {
            -y * (-half_lambda * x * y + half_lambda * y).exp()
        } else {
            y * (-half_lambda * x * y).exp() / (T::from_f64(2.0) * (half_lambda * y).sinh())
        }
    }

    fn statistics(&self) -> Statistics {
        Statistics::Bosonic
    }

    fn lambda(&self) -> f64 {
        self.lambda
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Df64;
    use approx::assert_relative_eq;
    use xprec_svd::Precision;

    fn grid() -> Vec<f64> {
        (0..=10).map(|i| -1.0 + 0.2 * i as f64).collect()
    }

    #[test]
    fn test_fermionic_kernel_formula() {
        let kernel = FermionicKernel::new(10.0).unwrap();
        for &x in &grid() {
            for &y in &grid() {
                let expected = (-5.0 * x * y).exp() / (2.0 * (5.0 * y).cosh());
                assert_relative_eq!(kernel.evaluate(x, y), expected, max_relative = 1e-14);
            }
        }
    }

    #[test]
    fn test_bosonic_kernel_formula() {
        let kernel = BosonicKernel::new(10.0).unwrap();
        for &x in &grid() {
            for &y in &grid() {
                if y.abs() < 1e-12 {
                    continue;
                }
                let expected = y * (-5.0 * x * y).exp() / (2.0 * (5.0 * y).sinh());
                assert_relative_eq!(kernel.evaluate(x, y), expected, max_relative = 1e-14);
            }
        }
    }

    #[test]
    fn test_centrosymmetry() {
        let fermionic = FermionicKernel::new(42.0).unwrap();
        let bosonic = BosonicKernel::new(42.0).unwrap();
        for &x in &[0.1, 0.5, 0.9] {
            for &y in &[0.0, 0.3, 1.0] {
                assert_relative_eq!(
                    fermionic.evaluate(x, y),
                    fermionic.evaluate(-x, -y),
                    max_relative = 1e-14
                );
                assert_relative_eq!(
                    bosonic.evaluate(x, y),
                    bosonic.evaluate(-x, -y),
                    max_relative = 1e-14
                );
            }
        }
    }

    #[test]
    fn test_bosonic_zero_limit() {
        let kernel = BosonicKernel::new(4.0).unwrap();
        // K(x, 0) = 1/Λ, approached continuously
        assert_relative_eq!(kernel.evaluate(0.3, 0.0), 0.25, max_relative = 1e-15);
        assert_relative_eq!(kernel.evaluate(0.3, 1e-9), 0.25, max_relative = 1e-8);
    }

    #[test]
    fn test_asymptotic_branches() {
        // Λy = 1e4: the direct formula overflows, the asymptotic branch does not
        let fermionic = FermionicKernel::new(1e4).unwrap();
        let value = fermionic.evaluate(-1.0, 1.0);
        assert_relative_eq!(value, 1.0, max_relative = 1e-14);
        let value = fermionic.evaluate(-0.99, 1.0);
        assert_relative_eq!(value, (-50.0_f64).exp(), max_relative = 1e-10);

        let bosonic = BosonicKernel::new(1e4).unwrap();
        assert_relative_eq!(bosonic.evaluate(1.0, -1.0), 1.0, max_relative = 1e-14);
        assert!(bosonic.evaluate(0.5, 1.0).is_finite());

        // Continuity across the branch at Λy = 200
        let k = FermionicKernel::new(400.0).unwrap();
        let below = k.evaluate(0.0, 0.5 - 1e-12);
        let above = k.evaluate(0.0, 0.5 + 1e-12);
        assert_relative_eq!(below, above, max_relative = 1e-9);
    }

    #[test]
    fn test_df64_evaluation() {
        let kernel = FermionicKernel::new(100.0).unwrap();
        let x = Df64::from(0.3);
        let y = Df64::from(-0.7);
        let dd = kernel.evaluate(x, y).to_f64();
        assert_relative_eq!(dd, kernel.evaluate(0.3, -0.7), max_relative = 1e-13);
    }

    #[test]
    fn test_reduced_kernels() {
        let kernel = BosonicKernel::new(5.0).unwrap();
        let (x, y) = (0.4, 0.6);
        let plus = kernel.evaluate(x, y) + kernel.evaluate(x, -y);
        let minus = kernel.evaluate(x, y) - kernel.evaluate(x, -y);
        assert_relative_eq!(kernel.even_part(x, y), plus, max_relative = 1e-15);
        assert_relative_eq!(kernel.odd_part(x, y), minus, max_relative = 1e-15);
        assert_eq!(SymmetryType::Odd.sign(), -1);
    }

    #[test]
    fn test_invalid_lambda() {
        assert!(matches!(FermionicKernel::new(0.0), Err(IrError::InvalidParameter(_))));
        assert!(BosonicKernel::new(-1.0).is_err());
        assert!(BosonicKernel::new(f64::NAN).is_err());
        assert_eq!(FermionicKernel::new(3.0).unwrap().statistics(), Statistics::Fermionic);
        assert_eq!(BosonicKernel::new(3.0).unwrap().lambda(), 3.0);
    }
}
