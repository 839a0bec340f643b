use rust_decimal::{Decimal, RoundingStrategy};

pub mod chart;
pub mod table;

/// Formats a money amount with exactly two decimals.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
