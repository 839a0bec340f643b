use inquire::{Select, Text};

use crate::{app::ExpenseForm, errors::SpendbookError, expenses::RawExpenseInput};

/// Prompts for the three expense fields.
///
/// Whatever was entered last is offered again on the next read, until the
/// form is reset after a successful add.
#[derive(Debug, Clone)]
pub struct InquireForm {
    categories: Vec<String>,
    currency: char,
    decimal_sep: char,
    current: RawExpenseInput,
}

impl InquireForm {
    pub fn new(categories: Vec<String>, currency: char, decimal_sep: char) -> Self {
        Self {
            categories,
            currency,
            decimal_sep,
            current: RawExpenseInput::default(),
        }
    }

    pub fn with_input(mut self, input: RawExpenseInput) -> Self {
        self.current = input;
        self
    }

    fn category_cursor(&self) -> usize {
        self.categories
            .iter()
            .position(|category| *category == self.current.category)
            .unwrap_or(0)
    }
}

impl ExpenseForm for InquireForm {
    fn read(&mut self) -> Result<RawExpenseInput, SpendbookError> {
        self.current.description = Text::new("Description:")
            .with_initial_value(&self.current.description)
            .prompt()?;

        let help = format!(
            "Type the amount in {} using '{}' as the decimal separator",
            self.currency, self.decimal_sep
        );
        self.current.amount = Text::new("Amount:")
            .with_initial_value(&self.current.amount)
            .with_help_message(&help)
            .prompt()?;

        self.current.category = Select::new("Category:", self.categories.clone())
            .with_starting_cursor(self.category_cursor())
            .prompt()?;

        Ok(self.current.clone())
    }

    fn reset(&mut self) {
        self.current = RawExpenseInput::default();
    }
}

/// Form input given up front, e.g. on the command line.
#[derive(Debug, Clone, Default)]
pub struct PresetForm {
    input: RawExpenseInput,
}

impl PresetForm {
    pub fn new(input: RawExpenseInput) -> Self {
        Self { input }
    }
}

impl ExpenseForm for PresetForm {
    fn read(&mut self) -> Result<RawExpenseInput, SpendbookError> {
        Ok(self.input.clone())
    }

    fn reset(&mut self) {
        self.input = RawExpenseInput::default();
    }
}
