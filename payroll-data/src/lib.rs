//! Data access for the payroll calculator: bracket tables, user settings,
//! and CSV import/export of ledger records.

pub mod export;
pub mod import;
pub mod loader;
pub mod settings;

pub use export::{ExportError, export_expenses, export_income, export_transactions};
pub use import::{
    GrossUpContext, LedgerImportError, import_transactions, import_transactions_from_path,
};
pub use loader::{BracketLoader, BracketLoaderError, BracketRecord, Jurisdiction};
pub use settings::{CppOverrides, Settings, SettingsError};
