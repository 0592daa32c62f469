//! Owner-salary and expense ledger with running payroll totals and a
//! corporate tax estimate.

mod corporate;
mod expense;
mod transaction;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::TaxCalculatorError;

pub use corporate::{
    CorporateIncome, CorporateTaxRates, CorporateTaxSummary, Currency, IncomeTotals,
    corporate_tax, income_totals,
};
pub use expense::{EmployeeExpense, ExpenseType, expense_totals, expense_totals_by_currency};
pub use transaction::{LedgerSummary, RunningTotal, Transaction, TransactionKind, running_totals};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("exchange rate must be positive, got {0}")]
    InvalidExchangeRate(Decimal),

    #[error("CAD amount is out of range for {amount} at exchange rate {exchange_rate}")]
    ConversionOutOfRange { amount: Decimal, exchange_rate: Decimal },

    #[error("ledger total is out of range after adding {0}")]
    TotalOutOfRange(Decimal),

    #[error(transparent)]
    Calculation(#[from] TaxCalculatorError),
}

/// Adds `amount` to a running ledger total.
fn add_to_total(
    total: Decimal,
    amount: Decimal,
) -> Result<Decimal, LedgerError> {
    total
        .checked_add(amount)
        .ok_or(LedgerError::TotalOutOfRange(amount))
}
