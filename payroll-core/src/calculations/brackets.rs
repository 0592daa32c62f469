//! Progressive bracket taxation.

use rust_decimal::Decimal;

use crate::models::BracketTable;

/// Total tax owed on `income` under a progressive bracket table.
///
/// Only the slice of income inside each bracket is taxed at that bracket's
/// rate. Brackets are walked in ascending order and the walk stops at the
/// first bracket whose lower bound is not exceeded, so income sitting exactly
/// on a boundary is taxed entirely in the lower bracket.
///
/// Negative income owes nothing.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::TaxYearConfig;
/// use payroll_core::calculations::calculate_tax_amount;
///
/// let config = TaxYearConfig::canada_2024();
///
/// // Exactly at the top of the first federal bracket
/// assert_eq!(calculate_tax_amount(dec!(55867), config.federal()), dec!(8380.05));
///
/// // 55,867 × 15% + 19,133 × 20.5%
/// assert_eq!(calculate_tax_amount(dec!(75000), config.federal()), dec!(12302.315));
/// ```
pub fn calculate_tax_amount(
    income: Decimal,
    table: &BracketTable,
) -> Decimal {
    let mut tax = Decimal::ZERO;

    for bracket in table.brackets() {
        if income <= bracket.min_income {
            break;
        }
        tax += bracket.taxable_portion(income) * bracket.tax_rate;
    }

    tax
}
