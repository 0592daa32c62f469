//! Command-line front end for the payroll calculator.

pub mod logging;
pub mod report;
pub mod utils;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use payroll_core::ledger::{LedgerSummary, running_totals};
use payroll_core::{TaxCalculator, TaxYearConfig};
use payroll_data::{GrossUpContext, Settings, export_transactions, import_transactions_from_path};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::utils::parse_amount;

/// Canadian payroll deductions: marginal and effective rates, CPP, and
/// net-to-gross owner salary.
///
/// Settings come from an optional TOML file; without one, Ontario and the
/// built-in 2024 tables apply.
#[derive(Debug, Parser)]
#[command(name = "payroll", version, about, long_about = None)]
pub struct Cli {
    /// Settings file (province, annual income, brackets file, CPP overrides)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bracket CSV file; overrides `brackets_file` from the settings
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    /// Log calculation details
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Marginal and effective tax rates at an annual income
    Rates {
        /// Annual income, e.g. 75000 or "75,000"
        #[arg(long, value_parser = parse_amount)]
        income: Decimal,

        /// Province code; defaults to the settings province
        #[arg(short, long)]
        province: Option<String>,
    },

    /// CPP contribution at an annual income
    Cpp {
        /// Annual income, e.g. 68500 or "68,500"
        #[arg(long, value_parser = parse_amount)]
        income: Decimal,

        /// Use the employee rate instead of the self-employed rate
        #[arg(long, default_value_t = false)]
        employee: bool,
    },

    /// Gross salary that leaves a given take-home amount
    GrossUp {
        /// Desired take-home amount
        #[arg(long, value_parser = parse_amount)]
        net: Decimal,

        /// Projected annual income; defaults to the settings value
        #[arg(long, value_parser = parse_amount)]
        income: Option<Decimal>,

        /// Province code; defaults to the settings province
        #[arg(short, long)]
        province: Option<String>,
    },

    /// Import a transaction CSV and print running payroll totals
    Ledger {
        /// Transaction CSV with columns date,type,amount,notes
        #[arg(short, long)]
        file: PathBuf,

        /// Write the grossed-up transactions to this CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

/// Loads settings and bracket tables selected by the global options.
pub fn load_settings(cli: &Cli) -> Result<(Settings, TaxYearConfig)> {
    let mut settings = Settings::load_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load settings: {}", path.display()),
            None => "Failed to apply default settings".to_string(),
        }
    })?;

    if let Some(brackets) = &cli.brackets {
        settings.brackets_file = Some(brackets.clone());
    }

    let config = settings
        .tax_year_config()
        .context("Failed to build tax tables")?;
    debug!(tax_year = config.tax_year(), province = %settings.province, "configuration ready");

    Ok((settings, config))
}

/// Runs the parsed command, writing its report to `out`.
pub fn run<W: Write>(
    cli: &Cli,
    out: &mut W,
) -> Result<()> {
    let (settings, config) = load_settings(cli)?;
    let calculator = TaxCalculator::new(&config);

    match &cli.command {
        Command::Rates { income, province } => {
            let province = province.as_deref().unwrap_or(&settings.province);
            let rates = calculator.marginal_tax_rate(*income, province)?;
            write!(out, "{}", report::format_rates(*income, &rates))?;
        }
        Command::Cpp { income, employee } => {
            let contribution = calculator.cpp_contribution(*income, !employee)?;
            write!(out, "{}", report::format_cpp(*income, !employee, contribution))?;
        }
        Command::GrossUp {
            net,
            income,
            province,
        } => {
            let income = income.unwrap_or(settings.annual_income);
            let province = province.as_deref().unwrap_or(&settings.province);
            let result = calculator
                .gross_from_net(*net, income, province)
                .with_context(|| format!("Cannot gross up {net} at annual income {income}"))?;
            write!(out, "{}", report::format_gross_up(*net, &result))?;
        }
        Command::Ledger { file, export } => {
            let context = GrossUpContext {
                calculator,
                annual_income: settings.annual_income,
                province: &settings.province,
            };
            let transactions = import_transactions_from_path(file, &context)
                .with_context(|| format!("Failed to import: {}", file.display()))?;
            info!(count = transactions.len(), "imported transactions");

            let rows = running_totals(&transactions).context("Failed to total the ledger")?;
            let summary =
                LedgerSummary::from_transactions(&transactions).context("Failed to total the ledger")?;
            write!(out, "{}", report::format_ledger(&rows, &summary))?;

            if let Some(path) = export {
                let writer = File::create(path)
                    .with_context(|| format!("Failed to create: {}", path.display()))?;
                export_transactions(writer, &transactions)
                    .with_context(|| format!("Failed to export: {}", path.display()))?;
                info!(path = %path.display(), "exported transactions");
            }
        }
    }

    Ok(())
}
