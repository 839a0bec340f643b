use std::fmt::Display;

use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{errors::ValidationError, parse::parse_amount};

pub mod store;

/// Largest accepted amount. Together with rounding to cents this keeps every
/// amount exactly representable as a JSON number and keeps sums far from overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Opaque record identifier: creation time in milliseconds followed by a
/// random suffix below 1000, both as decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn generate<R: Rng>(now_millis: i64, rng: &mut R) -> Self {
        let suffix: u16 = rng.random_range(0..1000);
        Self(format!("{now_millis}{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExpenseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExpenseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Older saves stored the id as a bare number.
impl<'de> Deserialize<'de> for ExpenseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StoredId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match StoredId::deserialize(deserializer)? {
            StoredId::Text(text) => Self(text),
            StoredId::Number(number) => Self(number.to_string()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    pub date: String,
}

/// The three form fields exactly as the user typed or selected them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExpenseInput {
    pub description: String,
    pub amount: String,
    pub category: String,
}

impl RawExpenseInput {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
        }
    }
}

/// Form input that passed validation; still lacks an id and a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

impl ValidExpense {
    pub fn into_expense(self, id: ExpenseId, date: String) -> Expense {
        Expense {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date,
        }
    }
}

/// Checks, in order: all fields present, amount is a number, amount is
/// positive once rounded to cents, amount is at most [`MAX_AMOUNT`].
pub fn validate(
    input: &RawExpenseInput,
    decimal_sep: char,
) -> Result<ValidExpense, ValidationError> {
    let description = input.description.trim();
    let amount_text = input.amount.trim();
    let category = input.category.trim();
    if description.is_empty() || amount_text.is_empty() || category.is_empty() {
        return Err(ValidationError::MissingField);
    }

    let amount = parse_amount(amount_text, decimal_sep)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }

    Ok(ValidExpense {
        description: description.to_string(),
        amount,
        category: category.to_string(),
    })
}
