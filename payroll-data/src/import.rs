//! CSV import for ledger transactions.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column   | Required | Type    | Notes                                          |
//! |----------|----------|---------|------------------------------------------------|
//! | `date`   | yes      | date    | `YYYY-MM-DD`                                   |
//! | `type`   | yes      | string  | `owner_salary` or `expense`                    |
//! | `amount` | yes      | decimal | Net take-home for salary, paid amount for expenses |
//! | `notes`  | no       | string  | Leave empty or omit the column                 |
//!
//! ### Example
//!
//! ```csv
//! date,type,amount,notes
//! 2024-01-31,owner_salary,4000.00,January pay
//! 2024-02-03,expense,129.99,Domain renewal
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use payroll_core::TaxCalculator;
use payroll_core::ledger::{LedgerError, Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::loader::deserialize_decimal;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    amount: Decimal,
    #[serde(default)]
    notes: Option<String>,
}

/// Errors that can occur while importing transactions.
#[derive(Debug, thiserror::Error)]
pub enum LedgerImportError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `type` cell was not a recognised transaction type. `row` is
    /// 1-based, not counting the header.
    #[error("unrecognised transaction type '{kind}' on row {row}")]
    InvalidType { kind: String, row: usize },

    /// The row was well-formed but could not be recorded.
    #[error("row {row}: {source}")]
    Ledger {
        row: usize,
        #[source]
        source: LedgerError,
    },
}

/// Rates applied when grossing up imported salary rows.
#[derive(Debug, Clone, Copy)]
pub struct GrossUpContext<'a> {
    pub calculator: TaxCalculator<'a>,
    pub annual_income: Decimal,
    pub province: &'a str,
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
    context: &GrossUpContext<'_>,
) -> Result<Transaction, LedgerImportError> {
    let kind =
        TransactionKind::parse(&row.kind).ok_or_else(|| LedgerImportError::InvalidType {
            kind: row.kind.clone(),
            row: row_number,
        })?;
    let notes = row.notes.unwrap_or_default();

    let transaction = match kind {
        TransactionKind::OwnerSalary => Transaction::owner_salary_from_net(
            row.date,
            row.amount,
            notes,
            &context.calculator,
            context.annual_income,
            context.province,
        ),
        TransactionKind::Expense => Transaction::expense(row.date, row.amount, notes),
    };

    transaction.map_err(|source| LedgerImportError::Ledger {
        row: row_number,
        source,
    })
}

/// Read every transaction from `reader`, grossing up salary rows with `context`.
///
/// Stops at the first invalid row.
pub fn import_transactions<R: Read>(
    reader: R,
    context: &GrossUpContext<'_>,
) -> Result<Vec<Transaction>, LedgerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut transactions = Vec::new();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        transactions.push(convert_row(row, index + 1, context)?);
    }

    debug!(count = transactions.len(), "imported transactions");
    Ok(transactions)
}

/// Read every transaction from the CSV file at `path`.
pub fn import_transactions_from_path(
    path: &Path,
    context: &GrossUpContext<'_>,
) -> Result<Vec<Transaction>, LedgerImportError> {
    let file = File::open(path).map_err(|source| LedgerImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    import_transactions(file, context)
}
