//! Plain-text rendering of calculation results.

use payroll_core::ledger::{LedgerSummary, RunningTotal};
use payroll_core::{GrossUpResult, MarginalRateResult};
use rust_decimal::Decimal;

use crate::utils::{fmt_currency, fmt_percent};

pub fn format_rates(
    income: Decimal,
    rates: &MarginalRateResult,
) -> String {
    format!(
        "Annual income:   {:>12}   Province:        {:>12}\n\n\
         Marginal federal:    {:>8}   Effective federal:    {:>8}\n\
         Marginal provincial: {:>8}   Effective provincial: {:>8}\n\
         Marginal combined:   {:>8}   Effective combined:   {:>8}\n",
        fmt_currency(income),
        rates.province.as_str(),
        fmt_percent(rates.federal_rate),
        fmt_percent(rates.effective_federal_rate),
        fmt_percent(rates.provincial_rate),
        fmt_percent(rates.effective_provincial_rate),
        fmt_percent(rates.combined_rate),
        fmt_percent(rates.effective_combined_rate),
    )
}

pub fn format_cpp(
    income: Decimal,
    is_self_employed: bool,
    contribution: Decimal,
) -> String {
    let basis = if is_self_employed {
        "self-employed"
    } else {
        "employee"
    };
    format!(
        "Annual income:   {:>12}\nCPP ({basis}): {:>12}\n",
        fmt_currency(income),
        fmt_currency(contribution),
    )
}

pub fn format_gross_up(
    net_amount: Decimal,
    result: &GrossUpResult,
) -> String {
    format!(
        "Net amount:      {:>12}\n\
         Gross amount:    {:>12}\n\
         Federal tax:     {:>12}\n\
         Provincial tax:  {:>12}\n\
         CPP payment:     {:>12}\n\
         Total deductions:{:>12}\n",
        fmt_currency(net_amount),
        fmt_currency(result.gross_amount),
        fmt_currency(result.federal_tax),
        fmt_currency(result.provincial_tax),
        fmt_currency(result.cpp_payment),
        fmt_currency(result.total_deductions),
    )
}

pub fn format_ledger(
    rows: &[RunningTotal<'_>],
    summary: &LedgerSummary,
) -> String {
    let mut out = format!(
        "{:<10}  {:<12}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}\n",
        "Date", "Type", "Amount", "Federal", "Provincial", "CPP", "Running"
    );
    for row in rows {
        let t = row.transaction;
        out.push_str(&format!(
            "{:<10}  {:<12}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}\n",
            t.date.format("%Y-%m-%d").to_string(),
            t.kind.as_str(),
            fmt_currency(t.amount),
            fmt_currency(t.federal_tax),
            fmt_currency(t.provincial_tax),
            fmt_currency(t.cpp_payment),
            fmt_currency(row.running_total),
        ));
    }

    out.push_str(&format!(
        "\nOwner salary:    {:>12}   Expenses:        {:>12}\n\
         Federal tax:     {:>12}   Provincial tax:  {:>12}\n\
         CPP:             {:>12}   PAYROLL TAX OWED:{:>12}\n",
        fmt_currency(summary.total_owner_salary),
        fmt_currency(summary.total_expenses),
        fmt_currency(summary.total_federal_tax),
        fmt_currency(summary.total_provincial_tax),
        fmt_currency(summary.total_cpp),
        fmt_currency(summary.total_payroll_tax_owed),
    ));
    out
}
