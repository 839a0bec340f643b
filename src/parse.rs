use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::ValidationError;

/// Parses user-typed amount text.
///
/// Both `.` and the configured `decimal_sep` are accepted as the decimal
/// separator, as is an optional leading `+` and an exponent (`1.5e2`).
/// Anything else left over after the number makes the whole text invalid.
pub fn parse_amount(text: &str, decimal_sep: char) -> Result<Decimal, ValidationError> {
    let text = text.trim();
    let unsigned = match text.strip_prefix('+') {
        Some(rest) if rest.starts_with(['+', '-']) => return Err(ValidationError::NotANumber),
        Some(rest) => rest,
        None => text,
    };
    if unsigned.is_empty() {
        return Err(ValidationError::NotANumber);
    }
    let normalized: String = unsigned
        .chars()
        .map(|c| if c == decimal_sep { '.' } else { c })
        .collect();
    if normalized.chars().filter(|&c| c == '.').count() > 1 {
        return Err(ValidationError::NotANumber);
    }

    let parsed = if normalized.contains(['e', 'E']) {
        Decimal::from_scientific(&normalized)
    } else {
        Decimal::from_str(&normalized)
    };
    parsed.map_err(|_| ValidationError::NotANumber)
}
