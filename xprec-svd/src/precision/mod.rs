//! Precision type definitions and implementations
//!
//! `Precision` is the arithmetic the SVD needs. It is implemented for `f64`
//! and for `Df64`, a double-double number stored in a `twofloat::TwoFloat`
//! (about 32 significant digits).

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use twofloat::TwoFloat;

/// Trait for precision types used in high-precision SVD computations
pub trait Precision:
    Copy
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + 'static
{
    /// Convert from f64 (exact for both implementations)
    fn from_f64(x: f64) -> Self;

    /// Round to the nearest f64
    fn to_f64(self) -> f64;

    /// Machine epsilon for this precision type
    fn epsilon() -> Self;

    /// Smallest positive value that still carries full precision
    fn min_positive() -> Self;

    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    fn one() -> Self {
        Self::from_f64(1.0)
    }

    /// Square root function
    fn sqrt(self) -> Self;

    /// Absolute value function
    fn abs(self) -> Self;

    /// Check if value is finite
    fn is_finite(self) -> bool;

    /// Maximum of two values
    fn max(self, other: Self) -> Self {
        if self >= other { self } else { other }
    }

    /// Minimum of two values
    fn min(self, other: Self) -> Self {
        if self <= other { self } else { other }
    }
}

impl Precision for f64 {
    #[inline]
    fn from_f64(x: f64) -> Self {
        x
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    fn epsilon() -> f64 {
        f64::EPSILON
    }

    fn min_positive() -> f64 {
        f64::MIN_POSITIVE
    }

    #[inline]
    fn sqrt(self) -> f64 {
        f64::sqrt(self)
    }

    #[inline]
    fn abs(self) -> f64 {
        f64::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// Double-double number
///
/// An unevaluated sum `hi + lo` with |lo| ≤ ulp(hi)/2, stored in a
/// `TwoFloat`. Arithmetic is done here on the two words with the error-free
/// transformations `TwoFloat::new_add` and `TwoFloat::new_mul` (fused
/// multiply-add), which keeps every operation, division included, accurate
/// to about 2^-104 relative.
#[derive(Debug, Clone, Copy)]
pub struct Df64(pub TwoFloat);

/// Renormalize `a + b`, requires |a| ≥ |b|
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    (s, b - (s - a))
}

/// `a + b` as an unevaluated sum, exactly
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = TwoFloat::new_add(a, b);
    (s.hi(), s.lo())
}

/// `a * b` as an unevaluated sum, exactly
#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = TwoFloat::new_mul(a, b);
    (p.hi(), p.lo())
}

impl Df64 {
    /// Build from an unevaluated sum `hi + lo`
    pub fn new(hi: f64, lo: f64) -> Self {
        if !hi.is_finite() {
            return Self(TwoFloat::from_f64(hi));
        }
        Self(TwoFloat::new_add(hi, lo))
    }

    pub fn hi(self) -> f64 {
        self.0.hi()
    }

    pub fn lo(self) -> f64 {
        self.0.lo()
    }

    pub fn into_inner(self) -> TwoFloat {
        self.0
    }

    /// Multiply by 2^n, exact unless the result leaves the normal range
    pub fn ldexp(self, n: i32) -> Self {
        let half = n / 2;
        let scale_a = 2f64.powi(half);
        let scale_b = 2f64.powi(n - half);
        Self::new(self.hi() * scale_a * scale_b, self.lo() * scale_a * scale_b)
    }

    fn add_dd(self, other: Df64) -> Df64 {
        let (s1, s2) = two_sum(self.hi(), other.hi());
        if !s1.is_finite() {
            return Df64::from(s1);
        }
        let (t1, t2) = two_sum(self.lo(), other.lo());
        let (s1, s2) = quick_two_sum(s1, s2 + t1);
        let (hi, lo) = quick_two_sum(s1, s2 + t2);
        Df64::new(hi, lo)
    }

    fn mul_dd(self, other: Df64) -> Df64 {
        let (p1, p2) = two_prod(self.hi(), other.hi());
        if !p1.is_finite() {
            return Df64::from(p1);
        }
        let p2 = p2 + (self.hi() * other.lo() + self.lo() * other.hi());
        let (hi, lo) = quick_two_sum(p1, p2);
        Df64::new(hi, lo)
    }

    /// Long division with three partial quotients
    fn div_dd(self, other: Df64) -> Df64 {
        let q1 = self.hi() / other.hi();
        if !q1.is_finite() || !other.hi().is_finite() {
            return Df64::from(q1);
        }
        let r = self.add_dd(-other.mul_dd(Df64::from(q1)));
        let q2 = r.hi() / other.hi();
        let r = r.add_dd(-other.mul_dd(Df64::from(q2)));
        let q3 = r.hi() / other.hi();
        let (q1, q2) = quick_two_sum(q1, q2);
        Df64::new(q1, q2).add_dd(Df64::from(q3))
    }
}

impl From<f64> for Df64 {
    fn from(x: f64) -> Self {
        Self(TwoFloat::from_f64(x))
    }
}

impl From<Df64> for f64 {
    fn from(x: Df64) -> Self {
        if x.hi().is_finite() {
            x.hi() + x.lo()
        } else {
            x.hi()
        }
    }
}

impl PartialEq for Df64 {
    fn eq(&self, other: &Df64) -> bool {
        self.hi() == other.hi() && self.lo() == other.lo()
    }
}

impl PartialOrd for Df64 {
    fn partial_cmp(&self, other: &Df64) -> Option<Ordering> {
        match self.hi().partial_cmp(&other.hi()) {
            Some(Ordering::Equal) => self.lo().partial_cmp(&other.lo()),
            ord => ord,
        }
    }
}

impl fmt::Display for Df64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&f64::from(*self), f)
    }
}

impl fmt::LowerExp for Df64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerExp::fmt(&f64::from(*self), f)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $imp:expr) => {
        impl $trait for Df64 {
            type Output = Df64;
            #[inline]
            fn $method(self, other: Df64) -> Df64 {
                $imp(self, other)
            }
        }

        impl $assign_trait for Df64 {
            #[inline]
            fn $assign_method(&mut self, other: Df64) {
                *self = $imp(*self, other);
            }
        }
    };
}

impl_binop!(Add, add, AddAssign, add_assign, Df64::add_dd);
impl_binop!(Sub, sub, SubAssign, sub_assign, |a: Df64, b: Df64| a.add_dd(-b));
impl_binop!(Mul, mul, MulAssign, mul_assign, Df64::mul_dd);
impl_binop!(Div, div, DivAssign, div_assign, Df64::div_dd);

impl Neg for Df64 {
    type Output = Df64;
    #[inline]
    fn neg(self) -> Df64 {
        Df64::new(-self.hi(), -self.lo())
    }
}

impl Precision for Df64 {
    #[inline]
    fn from_f64(x: f64) -> Self {
        Df64::from(x)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn epsilon() -> Self {
        // 2^-104
        Df64::from(f64::EPSILON * f64::EPSILON)
    }

    fn min_positive() -> Self {
        // Below this the low word is subnormal and the extra digits are lost
        Df64::from(f64::MIN_POSITIVE * 2f64.powi(53))
    }

    /// One Newton step on the f64 square root
    fn sqrt(self) -> Self {
        if self.hi() <= 0.0 {
            return if self.hi() == 0.0 {
                Df64::zero()
            } else {
                Df64::from(f64::NAN)
            };
        }
        let s = self.hi().sqrt();
        let (p1, p2) = two_prod(s, s);
        let residual = self - Df64::new(p1, p2);
        Df64::from(s) + Df64::from(residual.hi() / (2.0 * s))
    }

    #[inline]
    fn abs(self) -> Self {
        if self.hi() < 0.0 || (self.hi() == 0.0 && self.lo() < 0.0) {
            -self
        } else {
            self
        }
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.hi().is_finite() && self.lo().is_finite()
    }
}
