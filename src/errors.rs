use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpendbookError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
}

/// User input errors raised while validating the add-expense form.
///
/// The `Display` text is what the user gets to see.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all fields before adding an expense.")]
    MissingField,
    #[error("Please enter a valid positive number for the amount.")]
    NotANumber,
    #[error("Please enter a valid positive number for the amount.")]
    NonPositiveAmount,
    #[error("Please enter an amount no larger than 1000000000.00.")]
    AmountTooLarge,
}
