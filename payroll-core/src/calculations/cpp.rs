//! Canada Pension Plan contributions on pensionable earnings.

use rust_decimal::Decimal;

use crate::models::CppConfig;

/// Pensionable earnings: income above the basic exemption, capped at the
/// maximum pensionable earnings.
pub fn pensionable_earnings(
    income: Decimal,
    config: &CppConfig,
) -> Decimal {
    (income - config.basic_exemption)
        .max(Decimal::ZERO)
        .min(config.max_contributory_earnings())
}

/// CPP contribution owed on `income`.
///
/// Self-employed contributors pay both the employee and employer portions.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::CppConfig;
/// use payroll_core::calculations::calculate_cpp_contribution;
///
/// let config = CppConfig::canada_2024();
///
/// assert_eq!(calculate_cpp_contribution(dec!(3500), true, &config), dec!(0));
/// assert_eq!(calculate_cpp_contribution(dec!(68500), true, &config), dec!(7735));
/// assert_eq!(calculate_cpp_contribution(dec!(68500), false, &config), dec!(3867.5));
/// ```
pub fn calculate_cpp_contribution(
    income: Decimal,
    is_self_employed: bool,
    config: &CppConfig,
) -> Decimal {
    pensionable_earnings(income, config) * config.rate(is_self_employed)
}
