use payroll_core::calculations::common::round_half_up;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a command-line amount cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace, a leading `$`, and comma thousands separators.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .replace(',', "")
}

/// Parses an amount argument such as `75000`, `"75,000"` or `"$1,234.56"`.
///
/// Used as a clap `value_parser`, so unlike form input, empty text is an
/// error rather than zero.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    normalize_amount_input(s)
        .parse()
        .map_err(|source| ParseAmountError {
            input: s.to_string(),
            source,
        })
}

/// Formats an amount as currency, rounded half-up to cents.
pub fn fmt_currency(val: Decimal) -> String {
    format!("${:.2}", round_half_up(val))
}

/// Formats a rate as a percentage with two decimals (`0.2965` → `29.65%`).
pub fn fmt_percent(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate * Decimal::ONE_HUNDRED))
}
