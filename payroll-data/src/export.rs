//! CSV export of ledger records.
//!
//! Dates are written as `YYYY-MM-DD` and amounts are rounded half-up to
//! cents, always with two decimal places.
//!
//! | Export       | Columns                                                              |
//! |--------------|----------------------------------------------------------------------|
//! | transactions | Date, Type, Amount, Federal Tax, Provincial Tax, CPP Payment, Notes  |
//! | expenses     | Date, Type, Amount, Currency, Notes                                  |
//! | income       | Date, Client, Amount, Currency, Exchange Rate, CAD Amount, Notes     |

use std::io::Write;

use payroll_core::calculations::common::round_half_up;
use payroll_core::ledger::{CorporateIncome, EmployeeExpense, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

const TRANSACTION_HEADERS: [&str; 7] = [
    "Date",
    "Type",
    "Amount",
    "Federal Tax",
    "Provincial Tax",
    "CPP Payment",
    "Notes",
];
const EXPENSE_HEADERS: [&str; 5] = ["Date", "Type", "Amount", "Currency", "Notes"];
const INCOME_HEADERS: [&str; 7] = [
    "Date",
    "Client",
    "Amount",
    "Currency",
    "Exchange Rate",
    "CAD Amount",
    "Notes",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Formats an amount as cents with exactly two decimal places.
fn cents(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    rounded.to_string()
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    date: String,
    kind: &'static str,
    amount: String,
    federal_tax: String,
    provincial_tax: String,
    cpp_payment: String,
    notes: &'a str,
}

#[derive(Serialize)]
struct ExpenseRow<'a> {
    date: String,
    expense_type: &'static str,
    amount: String,
    currency: &'static str,
    notes: &'a str,
}

#[derive(Serialize)]
struct IncomeRow<'a> {
    date: String,
    client: &'a str,
    amount: String,
    currency: &'static str,
    exchange_rate: String,
    cad_amount: String,
    notes: &'a str,
}

/// Writes the header row even when there are no records.
fn write_rows<W, T, I>(
    writer: W,
    headers: &[&str],
    rows: I,
) -> Result<usize, ExportError>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(headers)?;

    let mut count = 0;
    for row in rows {
        csv_writer.serialize(row)?;
        count += 1;
    }
    csv_writer.flush()?;
    Ok(count)
}

/// Writes transactions with their payroll deductions.
pub fn export_transactions<W: Write>(
    writer: W,
    transactions: &[Transaction],
) -> Result<(), ExportError> {
    let rows = transactions.iter().map(|t| TransactionRow {
        date: t.date.format(DATE_FORMAT).to_string(),
        kind: t.kind.as_str(),
        amount: cents(t.amount),
        federal_tax: cents(t.federal_tax),
        provincial_tax: cents(t.provincial_tax),
        cpp_payment: cents(t.cpp_payment),
        notes: &t.notes,
    });
    let count = write_rows(writer, &TRANSACTION_HEADERS, rows)?;
    debug!(count, "exported transactions");
    Ok(())
}

/// Writes employee expenses.
pub fn export_expenses<W: Write>(
    writer: W,
    expenses: &[EmployeeExpense],
) -> Result<(), ExportError> {
    let rows = expenses.iter().map(|e| ExpenseRow {
        date: e.date.format(DATE_FORMAT).to_string(),
        expense_type: e.expense_type.as_str(),
        amount: cents(e.amount),
        currency: e.currency.as_str(),
        notes: &e.notes,
    });
    let count = write_rows(writer, &EXPENSE_HEADERS, rows)?;
    debug!(count, "exported expenses");
    Ok(())
}

/// Writes corporate income with its CAD conversion.
pub fn export_income<W: Write>(
    writer: W,
    income: &[CorporateIncome],
) -> Result<(), ExportError> {
    let rows = income.iter().map(|i| IncomeRow {
        date: i.date.format(DATE_FORMAT).to_string(),
        client: &i.client_name,
        amount: cents(i.amount),
        currency: i.currency.as_str(),
        exchange_rate: cents(i.exchange_rate),
        cad_amount: cents(i.cad_amount),
        notes: &i.notes,
    });
    let count = write_rows(writer, &INCOME_HEADERS, rows)?;
    debug!(count, "exported corporate income");
    Ok(())
}
