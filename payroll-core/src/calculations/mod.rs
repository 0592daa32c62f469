//! Payroll tax calculations: progressive brackets, CPP, and net-to-gross salary.

pub mod brackets;
pub mod calculator;
pub mod common;
pub mod cpp;

pub use brackets::calculate_tax_amount;
pub use calculator::{GrossUpResult, MarginalRateResult, TaxCalculator, TaxCalculatorError};
pub use cpp::{calculate_cpp_contribution, pensionable_earnings};
