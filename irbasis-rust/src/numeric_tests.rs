use crate::numeric::{CustomNumeric, Df64};
use approx::assert_abs_diff_eq;
use xprec_svd::Precision;

/// |a - b| / |b| in double-double
fn relative_error(a: Df64, b: Df64) -> f64 {
    ((a - b) / b).abs().to_f64()
}

#[test]
fn test_f64_transcendentals() {
    let x = 0.75_f64;
    assert_eq!(CustomNumeric::exp(x), x.exp());
    assert_eq!(CustomNumeric::cosh(x), x.cosh());
    assert_eq!(CustomNumeric::sinh(x), x.sinh());
}

#[test]
fn test_df64_agrees_with_f64() {
    for &x in &[-3.0, -0.5, 0.0, 0.1, 1.0, 7.25] {
        let d = Df64::from(x);
        assert_abs_diff_eq!(d.exp().to_f64(), x.exp(), epsilon = 1e-15 * x.exp());
        assert_abs_diff_eq!(d.cosh().to_f64(), x.cosh(), epsilon = 1e-15 * x.cosh());
        assert_abs_diff_eq!(d.sinh().to_f64(), x.sinh(), epsilon = 1e-14);
    }
}

#[test]
fn test_df64_against_reference_values() {
    // 50-digit values split into hi + lo
    let cases = [
        (Df64::from(-3.0).exp(), Df64::new(0.049787068367863944, -1.4831389691394365e-18)),
        (Df64::from(1.0).exp(), Df64::new(2.718281828459045, 1.4456468917292502e-16)),
        (Df64::from(30.0).exp(), Df64::new(10686474581524.463, -0.0007436345313492586)),
        (Df64::from(-100.0).exp(), Df64::new(3.720075976020836e-44, -1.5705024907732008e-60)),
        (Df64::from(2.5).cosh(), Df64::new(6.132289479663686, 3.560067179782552e-16)),
        (Df64::from(-0.3).sinh(), Df64::new(-0.3045202934471426, -9.177343117072388e-18)),
        (Df64::from(1e-5).sinh(), Df64::new(1.0000000000166668e-05, -6.182319396196156e-22)),
    ];
    for (i, (value, reference)) in cases.iter().enumerate() {
        let err = relative_error(*value, *reference);
        assert!(err < 1e-30, "case {}: relative error {:e}", i, err);
    }
}

#[test]
fn test_df64_exp_beyond_double() {
    // exp(x) * exp(-x) = 1 to double-double accuracy
    for &x in &[0.3, 2.5, 40.0] {
        let x = Df64::from(x);
        let product = x.exp() * (-x).exp();
        let err = (product - Df64::one()).abs().to_f64();
        assert!(err < 1e-30, "x = {}: err = {:e}", x, err);
    }
}

#[test]
fn test_df64_hyperbolic_identity() {
    // cosh² - sinh² = 1 where both are of order one
    for &x in &[-1.2, -0.01, 0.2, 0.9] {
        let x = Df64::from(x);
        let (c, s) = (x.cosh(), x.sinh());
        let err = (c * c - s * s - Df64::one()).abs().to_f64();
        assert!(err < 1e-30, "x = {}: err = {:e}", x, err);
    }
}

#[test]
fn test_df64_limits() {
    assert_eq!(Df64::from(0.0).exp(), Df64::one());
    assert_eq!(Df64::from(0.0).sinh(), Df64::zero());
    assert_eq!(Df64::from(800.0).exp().to_f64(), f64::INFINITY);
    assert_eq!(Df64::from(-800.0).exp(), Df64::zero());
    assert!(Df64::from(f64::NAN).exp().to_f64().is_nan());
}

#[test]
fn test_from_usize() {
    assert_eq!(<f64 as CustomNumeric>::from_usize(12), 12.0);
    assert_eq!(<Df64 as CustomNumeric>::from_usize(12).to_f64(), 12.0);
}
