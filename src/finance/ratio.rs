//! Division helper for derived ratios (DSCR, cash-on-cash, ROI)

/// Divide `numerator` by `denominator`, returning `None` when the ratio is undefined.
///
/// Undefined covers a zero denominator and any non-finite operand, so callers
/// never see `inf` or `NaN` leak into a result record.
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return None;
    }
    Some(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_is_none() {
        assert_eq!(safe_ratio(100.0, 0.0), None);
        assert_eq!(safe_ratio(0.0, 0.0), None);
    }

    #[test]
    fn test_non_finite_is_none() {
        assert_eq!(safe_ratio(f64::NAN, 2.0), None);
        assert_eq!(safe_ratio(1.0, f64::INFINITY), None);
    }

    #[test]
    fn test_plain_ratio() {
        assert_eq!(safe_ratio(3.0, 2.0), Some(1.5));
        assert_eq!(safe_ratio(-4.0, 8.0), Some(-0.5));
    }
}
