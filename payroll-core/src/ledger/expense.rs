use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, LedgerError, add_to_total};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    Flight,
    Hotel,
    Meals,
    Technology,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flight => "flight",
            Self::Hotel => "hotel",
            Self::Meals => "meals",
            Self::Technology => "technology",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "flight" => Some(Self::Flight),
            "hotel" => Some(Self::Hotel),
            "meals" => Some(Self::Meals),
            "technology" => Some(Self::Technology),
            _ => None,
        }
    }
}

/// An out-of-pocket expense paid by the employee, in its original currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeExpense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: Currency,
    pub expense_type: ExpenseType,
    pub notes: String,
}

impl EmployeeExpense {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        currency: Currency,
        expense_type: ExpenseType,
        notes: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(amount));
        }
        Ok(Self {
            date,
            amount,
            currency,
            expense_type,
            notes: notes.into(),
        })
    }
}

/// Sums expenses per currency and type. Currencies are never mixed.
///
/// # Errors
///
/// Returns [`LedgerError::TotalOutOfRange`] if a total overflows.
pub fn expense_totals(
    expenses: &[EmployeeExpense],
) -> Result<BTreeMap<(Currency, ExpenseType), Decimal>, LedgerError> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        let total = totals
            .entry((expense.currency, expense.expense_type))
            .or_insert(Decimal::ZERO);
        *total = add_to_total(*total, expense.amount)?;
    }
    Ok(totals)
}

/// Grand total of expenses in each currency.
///
/// # Errors
///
/// Returns [`LedgerError::TotalOutOfRange`] if a total overflows.
pub fn expense_totals_by_currency(
    expenses: &[EmployeeExpense],
) -> Result<BTreeMap<Currency, Decimal>, LedgerError> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        let total = totals.entry(expense.currency).or_insert(Decimal::ZERO);
        *total = add_to_total(*total, expense.amount)?;
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn expense(
        amount: Decimal,
        currency: Currency,
        expense_type: ExpenseType,
    ) -> EmployeeExpense {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        EmployeeExpense::new(date, amount, currency, expense_type, "").unwrap()
    }

    #[test]
    fn totals_group_by_currency_and_type() {
        let expenses = vec![
            expense(dec!(400), Currency::Cad, ExpenseType::Flight),
            expense(dec!(150), Currency::Cad, ExpenseType::Flight),
            expense(dec!(60), Currency::Usd, ExpenseType::Meals),
            expense(dec!(1200), Currency::Cad, ExpenseType::Technology),
        ];

        let totals = expense_totals(&expenses).unwrap();

        assert_eq!(
            totals,
            BTreeMap::from([
                ((Currency::Cad, ExpenseType::Flight), dec!(550)),
                ((Currency::Cad, ExpenseType::Technology), dec!(1200)),
                ((Currency::Usd, ExpenseType::Meals), dec!(60)),
            ])
        );
    }

    #[test]
    fn totals_per_currency_sum_every_type() {
        let expenses = vec![
            expense(dec!(400), Currency::Cad, ExpenseType::Flight),
            expense(dec!(85.50), Currency::Cad, ExpenseType::Meals),
            expense(dec!(60), Currency::Usd, ExpenseType::Meals),
            expense(dec!(220), Currency::Usd, ExpenseType::Hotel),
        ];

        let totals = expense_totals_by_currency(&expenses).unwrap();

        assert_eq!(
            totals,
            BTreeMap::from([(Currency::Cad, dec!(485.50)), (Currency::Usd, dec!(280))])
        );
    }

    #[test]
    fn totals_report_overflow() {
        let expenses = vec![
            expense(Decimal::MAX, Currency::Cad, ExpenseType::Hotel),
            expense(Decimal::MAX, Currency::Cad, ExpenseType::Hotel),
        ];

        assert_eq!(
            expense_totals(&expenses),
            Err(LedgerError::TotalOutOfRange(Decimal::MAX))
        );
        assert_eq!(
            expense_totals_by_currency(&expenses),
            Err(LedgerError::TotalOutOfRange(Decimal::MAX))
        );
    }

    #[test]
    fn rejects_negative_amount() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let result = EmployeeExpense::new(date, dec!(-5), Currency::Cad, ExpenseType::Hotel, "");

        assert_eq!(result, Err(LedgerError::NegativeAmount(dec!(-5))));
    }

    #[test]
    fn expense_type_round_trips_names() {
        for kind in [
            ExpenseType::Flight,
            ExpenseType::Hotel,
            ExpenseType::Meals,
            ExpenseType::Technology,
        ] {
            assert_eq!(ExpenseType::parse(kind.as_str()), Some(kind));
        }
    }
}
