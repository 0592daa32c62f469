use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{LedgerError, Transaction, TransactionKind, add_to_total};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "CAD")]
    Cad,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cad => "CAD",
            Self::Usd => "USD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAD" => Some(Self::Cad),
            "USD" => Some(Self::Usd),
            _ => None,
        }
    }
}

/// Revenue received from a client, with its Canadian-dollar value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateIncome {
    pub date: NaiveDate,
    pub client_name: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub exchange_rate: Decimal,
    pub cad_amount: Decimal,
    pub notes: String,
}

impl CorporateIncome {
    /// Records client income. CAD income always uses an exchange rate of 1.
    pub fn new(
        date: NaiveDate,
        client_name: impl Into<String>,
        amount: Decimal,
        currency: Currency,
        exchange_rate: Decimal,
        notes: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(amount));
        }
        let exchange_rate = match currency {
            Currency::Cad => Decimal::ONE,
            Currency::Usd if exchange_rate <= Decimal::ZERO => {
                return Err(LedgerError::InvalidExchangeRate(exchange_rate));
            }
            Currency::Usd => exchange_rate,
        };

        let cad_amount = amount.checked_mul(exchange_rate).ok_or(
            LedgerError::ConversionOutOfRange {
                amount,
                exchange_rate,
            },
        )?;

        Ok(Self {
            date,
            client_name: client_name.into(),
            amount,
            currency,
            exchange_rate,
            cad_amount,
            notes: notes.into(),
        })
    }
}

/// Flat small-business corporate tax rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxRates {
    pub federal_rate: Decimal,
    pub provincial_rate: Decimal,
}

impl Default for CorporateTaxRates {
    fn default() -> Self {
        Self {
            federal_rate: dec!(0.15),
            provincial_rate: dec!(0.032),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxSummary {
    pub total_income: Decimal,
    pub total_owner_salary: Decimal,
    pub taxable_income: Decimal,
    pub federal_corporate_tax: Decimal,
    pub provincial_corporate_tax: Decimal,
    pub total_corporate_tax: Decimal,
}

/// Income received per currency, plus everything converted to CAD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTotals {
    pub cad: Decimal,
    pub usd: Decimal,
    pub total_cad: Decimal,
}

/// Sums client income in its original currency and in CAD.
///
/// # Errors
///
/// Returns [`LedgerError::TotalOutOfRange`] if a total overflows.
pub fn income_totals(income: &[CorporateIncome]) -> Result<IncomeTotals, LedgerError> {
    let mut totals = IncomeTotals::default();
    for i in income {
        match i.currency {
            Currency::Cad => totals.cad = add_to_total(totals.cad, i.amount)?,
            Currency::Usd => totals.usd = add_to_total(totals.usd, i.amount)?,
        }
        totals.total_cad = add_to_total(totals.total_cad, i.cad_amount)?;
    }
    Ok(totals)
}

/// Corporate tax on client income after deducting owner salary.
///
/// Taxable income never drops below zero.
///
/// # Errors
///
/// Returns [`LedgerError::TotalOutOfRange`] if a total or tax amount overflows.
pub fn corporate_tax(
    income: &[CorporateIncome],
    transactions: &[Transaction],
    rates: &CorporateTaxRates,
) -> Result<CorporateTaxSummary, LedgerError> {
    let total_income = income_totals(income)?.total_cad;
    let mut total_owner_salary = Decimal::ZERO;
    for t in transactions.iter().filter(|t| t.kind == TransactionKind::OwnerSalary) {
        total_owner_salary = add_to_total(total_owner_salary, t.amount)?;
    }

    let taxable_income = (total_income - total_owner_salary).max(Decimal::ZERO);
    let taxed = |rate: Decimal| {
        taxable_income
            .checked_mul(rate)
            .ok_or(LedgerError::TotalOutOfRange(taxable_income))
    };
    let federal_corporate_tax = taxed(rates.federal_rate)?;
    let provincial_corporate_tax = taxed(rates.provincial_rate)?;

    Ok(CorporateTaxSummary {
        total_income,
        total_owner_salary,
        taxable_income,
        federal_corporate_tax,
        provincial_corporate_tax,
        total_corporate_tax: add_to_total(federal_corporate_tax, provincial_corporate_tax)?,
    })
}
