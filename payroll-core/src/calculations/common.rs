//! Shared arithmetic helpers for payroll calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to cents using half-up rounding.
///
/// Values at exactly half a cent round away from zero. Calculations keep
/// full precision; rounding is applied only when amounts are displayed or
/// exported.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1470.8706857)), dec!(1470.87));
/// assert_eq!(round_half_up(dec!(220.635)), dec!(220.64));
/// assert_eq!(round_half_up(dec!(-220.635)), dec!(-220.64));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides `numerator` by `denominator`, returning zero when the denominator is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::ratio_or_zero;
///
/// assert_eq!(ratio_or_zero(dec!(7500), dec!(50000)), dec!(0.15));
/// assert_eq!(ratio_or_zero(dec!(7500), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn ratio_or_zero(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(75.2064)), dec!(75.21));
        assert_eq!(round_half_up(dec!(75.2049)), dec!(75.20));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(8380.05)), dec!(8380.05));
    }

    #[test]
    fn ratio_or_zero_divides() {
        assert_eq!(ratio_or_zero(dec!(2556.529), dec!(50000)), dec!(0.05113058));
    }

    #[test]
    fn ratio_or_zero_guards_zero_denominator() {
        assert_eq!(ratio_or_zero(dec!(0), dec!(0)), Decimal::ZERO);
    }
}
