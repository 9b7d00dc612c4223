//! Type definitions for SVE computation

/// Mantissa bits carried by the double-double working type
const FLOAT64X2_BITS: f64 = 106.0;

/// Working precision type for SVE computations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TworkType {
    /// Use double precision (64-bit)
    Float64,
    /// Use extended precision (128-bit double-double)
    Float64X2,
    /// Automatically choose precision based on the cutoff
    #[default]
    Auto,
}

/// Bits of working precision needed to resolve singular values down to
/// `cutoff` relative to the largest one
pub fn required_bits(cutoff: f64) -> f64 {
    3.33 * ((1.0 / cutoff).log10() + 15.0)
}

/// Resolve the working precision for a given singular value cutoff
///
/// `Auto` selects `Float64X2` when the cutoff is below 1e-8 and `Float64`
/// otherwise; explicit choices are returned unchanged. A warning is logged
/// when the cutoff asks for more bits than `Float64X2` carries. The
/// construction goes ahead regardless; if the precision is insufficient the
/// singular values come out of order and the construction fails there.
pub fn choose_twork(cutoff: f64, twork: TworkType) -> TworkType {
    let actual = match twork {
        TworkType::Auto => {
            if cutoff < 1e-8 {
                TworkType::Float64X2
            } else {
                TworkType::Float64
            }
        }
        other => other,
    };

    let bits = required_bits(cutoff);
    if bits > FLOAT64X2_BITS {
        log::warn!(
            "cutoff {:e} needs about {:.0} bits of precision, more than the {} bits of Float64X2",
            cutoff,
            bits,
            FLOAT64X2_BITS
        );
    }
    log::debug!("working precision {:?} for cutoff {:e}", actual, cutoff);
    actual
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_float64() {
        assert_eq!(choose_twork(1e-7, TworkType::Auto), TworkType::Float64);
        assert_eq!(choose_twork(1e-8, TworkType::Auto), TworkType::Float64);
    }

    #[test]
    fn test_auto_float64x2() {
        assert_eq!(choose_twork(1e-10, TworkType::Auto), TworkType::Float64X2);
        assert_eq!(choose_twork(1e-12, TworkType::Auto), TworkType::Float64X2);
    }

    #[test]
    fn test_explicit_precision() {
        assert_eq!(choose_twork(1e-12, TworkType::Float64), TworkType::Float64);
        assert_eq!(choose_twork(1e-4, TworkType::Float64X2), TworkType::Float64X2);
    }

    #[test]
    fn test_required_bits() {
        // 1e-12 -> 3.33 * 27
        assert!((required_bits(1e-12) - 89.91).abs() < 1e-10);
        assert!(required_bits(1e-12) < FLOAT64X2_BITS);
        assert!(required_bits(1e-20) > FLOAT64X2_BITS);
    }

    #[test]
    fn test_default_is_auto() {
        assert_eq!(TworkType::default(), TworkType::Auto);
    }
}
