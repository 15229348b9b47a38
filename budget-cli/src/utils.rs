use budget_core::calculations::common::round_cents;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas
/// (thousands separator) and a leading dollar sign.
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .replace(',', "")
}

/// Parses a string into a [`Decimal`]. Used as the clap value parser for
/// every amount and percentage flag.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and an optional
/// `$` prefix. Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats an amount as dollars with thousands separators, e.g. `$1,234.50`
/// or `-$20.00`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${grouped}.{cents}", if negative { "-" } else { "" })
}

/// Formats a percentage value (already in percent units), e.g. `24.99%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.normalize())
}
