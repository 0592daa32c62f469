//! Payroll tax calculator for owner salary.
//!
//! Answers three questions for a projected annual income and a province:
//!
//! | Operation | Answer |
//! |-----------|--------|
//! | [`TaxCalculator::marginal_tax_rate`] | Marginal and effective federal/provincial rates |
//! | [`TaxCalculator::cpp_contribution`] | CPP owed on an income, clamped to the exemption and ceiling |
//! | [`TaxCalculator::gross_from_net`] | Gross salary needed to take home a given net amount |
//!
//! # Gross-up model
//!
//! The gross-up treats deductions as flat rates on gross pay: the *effective*
//! federal and provincial rates at the projected annual income, plus the
//! self-employed CPP rate applied without exemption or ceiling. With
//! `r = effective_federal + effective_provincial + cpp_rate`:
//!
//! ```text
//! net   = gross × (1 - r)
//! gross = net / (1 - r)
//! ```
//!
//! This flat CPP model intentionally differs from
//! [`TaxCalculator::cpp_contribution`]; the two answer different questions
//! and are kept separate. A combined rate of 1 or more has no meaningful
//! gross and is rejected with [`TaxCalculatorError::InvalidDeductionRate`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::TaxYearConfig;
//! use payroll_core::calculations::{TaxCalculator, common::round_half_up};
//!
//! let config = TaxYearConfig::canada_2024();
//! let calculator = TaxCalculator::new(&config);
//!
//! let result = calculator.gross_from_net(dec!(1000), dec!(50000), "ON").unwrap();
//!
//! assert_eq!(round_half_up(result.gross_amount), dec!(1470.87));
//! assert_eq!(round_half_up(result.federal_tax), dec!(220.63));
//! assert_eq!(round_half_up(result.provincial_tax), dec!(75.21));
//! assert_eq!(round_half_up(result.cpp_payment), dec!(175.03));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::brackets::calculate_tax_amount;
use crate::calculations::common::{ratio_or_zero, round_half_up};
use crate::calculations::cpp::calculate_cpp_contribution;
use crate::models::{ProvinceCode, TaxYearConfig};

/// Errors returned by [`TaxCalculator`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxCalculatorError {
    /// An income or amount was negative.
    #[error("{field} must be non-negative, got {value}")]
    InvalidInput { field: &'static str, value: Decimal },

    /// Federal, provincial and CPP rates together reach or exceed 100%.
    #[error("combined deduction rate {0} must be below 1")]
    InvalidDeductionRate(Decimal),

    /// The result does not fit in a `Decimal`.
    #[error("{field} is out of range for net amount {net_amount}")]
    AmountOutOfRange {
        field: &'static str,
        net_amount: Decimal,
    },
}

/// Marginal and effective rates for an annual income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalRateResult {
    /// Province whose table was applied, after any fallback.
    pub province: ProvinceCode,

    /// Federal rate on the next dollar earned.
    pub federal_rate: Decimal,

    /// Provincial rate on the next dollar earned.
    pub provincial_rate: Decimal,

    /// `federal_rate + provincial_rate`.
    pub combined_rate: Decimal,

    /// Total federal tax divided by income; zero for zero income.
    pub effective_federal_rate: Decimal,

    /// Total provincial tax divided by income; zero for zero income.
    pub effective_provincial_rate: Decimal,

    /// `effective_federal_rate + effective_provincial_rate`.
    pub effective_combined_rate: Decimal,
}

/// Breakdown of a net-to-gross salary calculation.
///
/// Amounts carry full precision; use [`GrossUpResult::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossUpResult {
    pub gross_amount: Decimal,
    pub federal_tax: Decimal,
    pub provincial_tax: Decimal,
    pub cpp_payment: Decimal,
    pub total_deductions: Decimal,
}

impl GrossUpResult {
    fn zero() -> Self {
        Self {
            gross_amount: Decimal::ZERO,
            federal_tax: Decimal::ZERO,
            provincial_tax: Decimal::ZERO,
            cpp_payment: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
        }
    }

    /// Take-home pay: gross minus every deduction.
    pub fn net_amount(&self) -> Decimal {
        self.gross_amount - self.total_deductions
    }

    /// Copy with every amount rounded half-up to cents.
    pub fn rounded(&self) -> Self {
        Self {
            gross_amount: round_half_up(self.gross_amount),
            federal_tax: round_half_up(self.federal_tax),
            provincial_tax: round_half_up(self.provincial_tax),
            cpp_payment: round_half_up(self.cpp_payment),
            total_deductions: round_half_up(self.total_deductions),
        }
    }
}

/// Stateless payroll calculator over one year's tables.
///
/// Holds only a shared reference to the configuration, so it is cheap to
/// create per call and safe to use from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Marginal and effective rates for `annual_income` in `province`.
    ///
    /// The marginal rate is that of the bracket whose `(min, max]` interval
    /// contains the income, or the first bracket for an income of zero.
    /// Provinces without a table use the Ontario table.
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculatorError::InvalidInput`] if `annual_income` is negative.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::TaxYearConfig;
    /// use payroll_core::calculations::TaxCalculator;
    ///
    /// let config = TaxYearConfig::canada_2024();
    /// let rates = TaxCalculator::new(&config)
    ///     .marginal_tax_rate(dec!(75000), "ON")
    ///     .unwrap();
    ///
    /// assert_eq!(rates.federal_rate, dec!(0.205));
    /// assert_eq!(rates.provincial_rate, dec!(0.0915));
    /// assert_eq!(rates.combined_rate, dec!(0.2965));
    /// ```
    pub fn marginal_tax_rate(
        &self,
        annual_income: Decimal,
        province: &str,
    ) -> Result<MarginalRateResult, TaxCalculatorError> {
        ensure_non_negative("annual income", annual_income)?;

        let federal_table = self.config.federal();
        let (province, provincial_table) = self.config.provincial_table(province);

        let federal_rate = federal_table.find_bracket(annual_income).tax_rate;
        let provincial_rate = provincial_table.find_bracket(annual_income).tax_rate;

        let federal_tax = calculate_tax_amount(annual_income, federal_table);
        let provincial_tax = calculate_tax_amount(annual_income, provincial_table);

        let effective_federal_rate = ratio_or_zero(federal_tax, annual_income);
        let effective_provincial_rate = ratio_or_zero(provincial_tax, annual_income);

        debug!(
            %annual_income,
            %province,
            %federal_rate,
            %provincial_rate,
            %effective_federal_rate,
            %effective_provincial_rate,
            "calculated tax rates"
        );

        Ok(MarginalRateResult {
            province,
            federal_rate,
            provincial_rate,
            combined_rate: federal_rate + provincial_rate,
            effective_federal_rate,
            effective_provincial_rate,
            effective_combined_rate: effective_federal_rate + effective_provincial_rate,
        })
    }

    /// CPP contribution on `income`, clamped between the basic exemption and
    /// the maximum pensionable earnings.
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculatorError::InvalidInput`] if `income` is negative.
    pub fn cpp_contribution(
        &self,
        income: Decimal,
        is_self_employed: bool,
    ) -> Result<Decimal, TaxCalculatorError> {
        ensure_non_negative("income", income)?;

        Ok(calculate_cpp_contribution(
            income,
            is_self_employed,
            self.config.cpp(),
        ))
    }

    /// Combined per-dollar deduction rate used by [`Self::gross_from_net`].
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculatorError::InvalidInput`] if `annual_income` is negative.
    pub fn total_deduction_rate(
        &self,
        annual_income: Decimal,
        province: &str,
    ) -> Result<Decimal, TaxCalculatorError> {
        let rates = self.marginal_tax_rate(annual_income, province)?;
        Ok(rates.effective_combined_rate + self.config.cpp().self_employed_rate)
    }

    /// Gross salary that leaves `net_amount` after federal tax, provincial tax
    /// and CPP, with rates taken from the projected `annual_income`.
    ///
    /// A net amount of zero yields an all-zero result.
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculatorError::InvalidInput`] if `net_amount` or
    /// `annual_income` is negative, and
    /// [`TaxCalculatorError::InvalidDeductionRate`] if the combined deduction
    /// rate is 1 or more, and [`TaxCalculatorError::AmountOutOfRange`] if the
    /// gross amount does not fit in a `Decimal`.
    pub fn gross_from_net(
        &self,
        net_amount: Decimal,
        annual_income: Decimal,
        province: &str,
    ) -> Result<GrossUpResult, TaxCalculatorError> {
        ensure_non_negative("net amount", net_amount)?;

        let rates = self.marginal_tax_rate(annual_income, province)?;
        let cpp_rate = self.config.cpp().self_employed_rate;
        let total_deduction_rate =
            rates.effective_federal_rate + rates.effective_provincial_rate + cpp_rate;

        if total_deduction_rate >= Decimal::ONE {
            warn!(%total_deduction_rate, %annual_income, "deduction rate leaves nothing to net");
            return Err(TaxCalculatorError::InvalidDeductionRate(
                total_deduction_rate,
            ));
        }

        if net_amount.is_zero() {
            return Ok(GrossUpResult::zero());
        }

        let out_of_range = |field: &'static str| {
            warn!(field, %net_amount, "gross-up overflowed");
            TaxCalculatorError::AmountOutOfRange { field, net_amount }
        };
        let gross_amount = net_amount
            .checked_div(Decimal::ONE - total_deduction_rate)
            .ok_or_else(|| out_of_range("gross amount"))?;
        let federal_tax = gross_amount
            .checked_mul(rates.effective_federal_rate)
            .ok_or_else(|| out_of_range("federal tax"))?;
        let provincial_tax = gross_amount
            .checked_mul(rates.effective_provincial_rate)
            .ok_or_else(|| out_of_range("provincial tax"))?;
        let cpp_payment = gross_amount
            .checked_mul(cpp_rate)
            .ok_or_else(|| out_of_range("CPP payment"))?;
        let total_deductions = federal_tax
            .checked_add(provincial_tax)
            .and_then(|sum| sum.checked_add(cpp_payment))
            .ok_or_else(|| out_of_range("total deductions"))?;

        debug!(%net_amount, %gross_amount, %total_deduction_rate, "grossed up salary");

        Ok(GrossUpResult {
            gross_amount,
            federal_tax,
            provincial_tax,
            cpp_payment,
            total_deductions,
        })
    }
}

fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), TaxCalculatorError> {
    if value < Decimal::ZERO {
        warn!(field, %value, "rejected negative input");
        return Err(TaxCalculatorError::InvalidInput { field, value });
    }
    Ok(())
}
