//! Custom numeric traits for high-precision computation
//!
//! `CustomNumeric` extends the SVD precision trait with the transcendental
//! functions needed by the kernels. It is implemented for `f64` and for the
//! double-double `Df64`.

use xprec_svd::Precision;

pub use xprec_svd::Df64;

/// Custom numeric trait for high-precision numerical computation
///
/// Every stage of the basis construction is generic over this trait, the
/// working precision being chosen once per construction.
pub trait CustomNumeric: Precision {
    /// Exponential function
    fn exp(self) -> Self;

    /// Hyperbolic cosine function
    fn cosh(self) -> Self;

    /// Hyperbolic sine function
    fn sinh(self) -> Self;

    /// Convert from a count or an index
    fn from_usize(n: usize) -> Self {
        Self::from_f64(n as f64)
    }
}

impl CustomNumeric for f64 {
    fn exp(self) -> Self {
        f64::exp(self)
    }

    fn cosh(self) -> Self {
        f64::cosh(self)
    }

    fn sinh(self) -> Self {
        f64::sinh(self)
    }
}

/// ln 2 as a double-double
fn ln2() -> Df64 {
    Df64::new(std::f64::consts::LN_2, 2.319046813846299558e-17)
}

/// Halvings applied before the Taylor series of `expm1_reduced`
const EXP_SQUARINGS: i32 = 8;

/// Taylor terms of `expm1_reduced`; |r| 2^-8 < 1.4e-3 leaves a truncation
/// error far below 2^-104
const EXP_TAYLOR_TERMS: usize = 11;

/// exp(r) - 1 for |r| ≤ ln(2)/2
///
/// The series is summed for r / 2^8 and brought back with
/// expm1(2z) = expm1(z) (expm1(z) + 2), which keeps the relative error of
/// the small result.
fn expm1_reduced(r: Df64) -> Df64 {
    let z = r.ldexp(-EXP_SQUARINGS);
    let mut term = z;
    let mut sum = z;
    for k in 2..=EXP_TAYLOR_TERMS {
        term = term * z / Df64::from_usize(k);
        sum += term;
    }
    let two = Df64::from(2.0);
    for _ in 0..EXP_SQUARINGS {
        sum = sum * (sum + two);
    }
    sum
}

/// exp(x) - 1 without cancellation for small |x|
fn expm1_df64(x: Df64) -> Df64 {
    if x.hi().abs() <= 0.5 * std::f64::consts::LN_2 {
        expm1_reduced(x)
    } else {
        exp_df64(x) - Df64::one()
    }
}

/// exp(x) = 2^n exp(x - n ln 2)
fn exp_df64(x: Df64) -> Df64 {
    let hi = x.hi();
    if hi.is_nan() {
        return x;
    }
    if hi > 709.79 {
        return Df64::from(f64::INFINITY);
    }
    if hi < -745.2 {
        return Df64::zero();
    }
    let n = (hi / std::f64::consts::LN_2).round();
    let r = x - ln2() * Df64::from(n);
    (Df64::one() + expm1_reduced(r)).ldexp(n as i32)
}

impl CustomNumeric for Df64 {
    fn exp(self) -> Self {
        exp_df64(self)
    }

    fn cosh(self) -> Self {
        let e = exp_df64(self.abs());
        (e + Df64::one() / e) * Df64::from(0.5)
    }

    /// (expm1(|x|) + expm1(|x|) / (expm1(|x|) + 1)) / 2 with the sign of x
    fn sinh(self) -> Self {
        let em = expm1_df64(self.abs());
        let value = (em + em / (em + Df64::one())) * Df64::from(0.5);
        if self.hi() < 0.0 {
            -value
        } else {
            value
        }
    }
}

#[cfg(test)]
#[path = "numeric_tests.rs"]
mod tests;
