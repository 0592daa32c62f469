use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{LedgerError, add_to_total};
use crate::calculations::TaxCalculator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    OwnerSalary,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OwnerSalary => "owner_salary",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "owner_salary" => Some(Self::OwnerSalary),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// A corporate transaction: salary paid to the owner or a business expense.
///
/// Salary rows carry the payroll deductions computed when they were entered;
/// expense rows carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,

    /// Gross amount paid out.
    pub amount: Decimal,

    /// Take-home amount the salary was grossed up from.
    pub net_amount: Option<Decimal>,

    pub federal_tax: Decimal,
    pub provincial_tax: Decimal,
    pub cpp_payment: Decimal,
    pub notes: String,
}

impl Transaction {
    /// Records an owner salary payment that nets `net_amount`.
    ///
    /// The gross amount and deductions come from
    /// [`TaxCalculator::gross_from_net`] at the projected `annual_income`.
    pub fn owner_salary_from_net(
        date: NaiveDate,
        net_amount: Decimal,
        notes: impl Into<String>,
        calculator: &TaxCalculator<'_>,
        annual_income: Decimal,
        province: &str,
    ) -> Result<Self, LedgerError> {
        let gross = calculator.gross_from_net(net_amount, annual_income, province)?;

        Ok(Self {
            date,
            kind: TransactionKind::OwnerSalary,
            amount: gross.gross_amount,
            net_amount: Some(net_amount),
            federal_tax: gross.federal_tax,
            provincial_tax: gross.provincial_tax,
            cpp_payment: gross.cpp_payment,
            notes: notes.into(),
        })
    }

    /// Records a business expense. Expenses carry no payroll deductions.
    pub fn expense(
        date: NaiveDate,
        amount: Decimal,
        notes: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(amount));
        }

        Ok(Self {
            date,
            kind: TransactionKind::Expense,
            amount,
            net_amount: None,
            federal_tax: Decimal::ZERO,
            provincial_tax: Decimal::ZERO,
            cpp_payment: Decimal::ZERO,
            notes: notes.into(),
        })
    }

    pub fn total_deductions(&self) -> Decimal {
        self.federal_tax + self.provincial_tax + self.cpp_payment
    }
}

/// A transaction with the payroll deductions accumulated up to and including it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunningTotal<'a> {
    pub transaction: &'a Transaction,
    pub running_federal_tax: Decimal,
    pub running_provincial_tax: Decimal,
    pub running_cpp: Decimal,
    pub running_total: Decimal,
}

/// Accumulates deductions in date order.
///
/// Transactions sharing a date keep their input order.
///
/// # Errors
///
/// Returns [`LedgerError::TotalOutOfRange`] if a running total overflows.
pub fn running_totals(transactions: &[Transaction]) -> Result<Vec<RunningTotal<'_>>, LedgerError> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.date);

    let mut federal = Decimal::ZERO;
    let mut provincial = Decimal::ZERO;
    let mut cpp = Decimal::ZERO;

    let mut rows = Vec::with_capacity(ordered.len());
    for transaction in ordered {
        federal = add_to_total(federal, transaction.federal_tax)?;
        provincial = add_to_total(provincial, transaction.provincial_tax)?;
        cpp = add_to_total(cpp, transaction.cpp_payment)?;
        let running_total = add_to_total(add_to_total(federal, provincial)?, cpp)?;

        rows.push(RunningTotal {
            transaction,
            running_federal_tax: federal,
            running_provincial_tax: provincial,
            running_cpp: cpp,
            running_total,
        });
    }
    Ok(rows)
}

/// Totals across every transaction in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_owner_salary: Decimal,
    pub total_expenses: Decimal,
    pub total_federal_tax: Decimal,
    pub total_provincial_tax: Decimal,
    pub total_cpp: Decimal,
    pub total_payroll_tax_owed: Decimal,
}

impl LedgerSummary {
    /// # Errors
    ///
    /// Returns [`LedgerError::TotalOutOfRange`] if a total overflows.
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self, LedgerError> {
        let mut summary = Self::default();
        for t in transactions {
            match t.kind {
                TransactionKind::OwnerSalary => {
                    summary.total_owner_salary = add_to_total(summary.total_owner_salary, t.amount)?;
                }
                TransactionKind::Expense => {
                    summary.total_expenses = add_to_total(summary.total_expenses, t.amount)?;
                }
            }
            summary.total_federal_tax = add_to_total(summary.total_federal_tax, t.federal_tax)?;
            summary.total_provincial_tax =
                add_to_total(summary.total_provincial_tax, t.provincial_tax)?;
            summary.total_cpp = add_to_total(summary.total_cpp, t.cpp_payment)?;
        }

        summary.total_payroll_tax_owed = add_to_total(
            add_to_total(summary.total_federal_tax, summary.total_provincial_tax)?,
            summary.total_cpp,
        )?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxYearConfig;
    use crate::calculations::TaxCalculatorError;

    fn date(
        month: u32,
        day: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn salary(
        calculator: &TaxCalculator<'_>,
        on: NaiveDate,
        net: Decimal,
    ) -> Transaction {
        Transaction::owner_salary_from_net(on, net, "", calculator, dec!(50000), "ON").unwrap()
    }

    #[test]
    fn owner_salary_stores_gross_up_breakdown() {
        let config = TaxYearConfig::canada_2024();
        let calculator = TaxCalculator::new(&config);

        let transaction = salary(&calculator, date(1, 31), dec!(1000));
        let expected = calculator
            .gross_from_net(dec!(1000), dec!(50000), "ON")
            .unwrap();

        assert_eq!(transaction.kind, TransactionKind::OwnerSalary);
        assert_eq!(transaction.amount, expected.gross_amount);
        assert_eq!(transaction.net_amount, Some(dec!(1000)));
        assert_eq!(transaction.total_deductions(), expected.total_deductions);
    }

    #[test]
    fn owner_salary_propagates_calculator_errors() {
        let config = TaxYearConfig::canada_2024();
        let calculator = TaxCalculator::new(&config);

        let result = Transaction::owner_salary_from_net(
            date(1, 31),
            dec!(-1),
            "",
            &calculator,
            dec!(50000),
            "ON",
        );

        assert_eq!(
            result,
            Err(LedgerError::Calculation(TaxCalculatorError::InvalidInput {
                field: "net amount",
                value: dec!(-1),
            }))
        );
    }

    #[test]
    fn expense_has_no_deductions() {
        let transaction = Transaction::expense(date(2, 1), dec!(250), "laptop").unwrap();

        assert_eq!(transaction.total_deductions(), Decimal::ZERO);
        assert_eq!(transaction.net_amount, None);
    }

    #[test]
    fn expense_rejects_negative_amount() {
        assert_eq!(
            Transaction::expense(date(2, 1), dec!(-250), ""),
            Err(LedgerError::NegativeAmount(dec!(-250)))
        );
    }

    #[test]
    fn running_totals_accumulate_in_date_order() {
        let config = TaxYearConfig::canada_2024();
        let calculator = TaxCalculator::new(&config);
        let march = salary(&calculator, date(3, 31), dec!(2000));
        let january = salary(&calculator, date(1, 31), dec!(1000));
        let expense = Transaction::expense(date(2, 15), dec!(300), "").unwrap();
        let transactions = vec![march.clone(), january.clone(), expense];

        let totals = running_totals(&transactions).unwrap();

        assert_eq!(
            totals.iter().map(|t| t.transaction.date).collect::<Vec<_>>(),
            vec![date(1, 31), date(2, 15), date(3, 31)]
        );
        assert_eq!(totals[0].running_total, january.total_deductions());
        assert_eq!(totals[1].running_total, january.total_deductions());
        assert_eq!(
            totals[2].running_total,
            january.total_deductions() + march.total_deductions()
        );
        assert_eq!(
            totals[2].running_cpp,
            january.cpp_payment + march.cpp_payment
        );
    }

    #[test]
    fn running_totals_of_empty_ledger() {
        assert!(running_totals(&[]).unwrap().is_empty());
    }

    #[test]
    fn summary_splits_salary_and_expenses() {
        let config = TaxYearConfig::canada_2024();
        let calculator = TaxCalculator::new(&config);
        let pay = salary(&calculator, date(1, 31), dec!(1000));
        let transactions = vec![
            pay.clone(),
            Transaction::expense(date(1, 5), dec!(120), "").unwrap(),
            Transaction::expense(date(1, 9), dec!(80), "").unwrap(),
        ];

        let summary = LedgerSummary::from_transactions(&transactions).unwrap();

        assert_eq!(summary.total_owner_salary, pay.amount);
        assert_eq!(summary.total_expenses, dec!(200));
        assert_eq!(summary.total_federal_tax, pay.federal_tax);
        assert_eq!(summary.total_payroll_tax_owed, pay.total_deductions());
    }

    fn overflowing_expense() -> Transaction {
        Transaction {
            date: date(4, 1),
            kind: TransactionKind::Expense,
            amount: Decimal::MAX,
            net_amount: None,
            federal_tax: Decimal::MAX,
            provincial_tax: Decimal::ZERO,
            cpp_payment: Decimal::ZERO,
            notes: String::new(),
        }
    }

    #[test]
    fn running_totals_report_overflow() {
        let transactions = vec![overflowing_expense(), overflowing_expense()];

        assert_eq!(
            running_totals(&transactions).map(|rows| rows.len()),
            Err(LedgerError::TotalOutOfRange(Decimal::MAX))
        );
    }

    #[test]
    fn summary_reports_overflow() {
        let transactions = vec![overflowing_expense(), overflowing_expense()];

        assert_eq!(
            LedgerSummary::from_transactions(&transactions),
            Err(LedgerError::TotalOutOfRange(Decimal::MAX))
        );
    }

    #[test]
    fn transaction_kind_parses_wire_names() {
        assert_eq!(TransactionKind::parse("owner_salary"), Some(TransactionKind::OwnerSalary));
        assert_eq!(TransactionKind::parse("expense"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("salary"), None);
    }
}
