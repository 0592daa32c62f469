pub mod calculations;
pub mod ledger;
pub mod models;

pub use calculations::{GrossUpResult, MarginalRateResult, TaxCalculator, TaxCalculatorError};
pub use models::*;
