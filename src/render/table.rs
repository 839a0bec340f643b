use rust_decimal::Decimal;

use crate::{
    errors::SpendbookError,
    expenses::{Expense, ExpenseId},
};

use super::format_amount;

pub const EMPTY_PLACEHOLDER: &str = "No expenses yet";

/// One displayed expense; `id` backs the row's delete control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub id: ExpenseId,
}

impl From<&Expense> for TableRow {
    fn from(expense: &Expense) -> Self {
        Self {
            date: expense.date.clone(),
            description: expense.description.clone(),
            category: expense.category.clone(),
            amount: format_amount(expense.amount),
            id: expense.id.clone(),
        }
    }
}

/// Whatever displays the expense table and the total line.
pub trait TableView {
    fn replace_rows(&mut self, rows: Vec<TableRow>) -> Result<(), SpendbookError>;
    fn show_placeholder(&mut self, message: &str) -> Result<(), SpendbookError>;
    fn set_total(&mut self, total: &str) -> Result<(), SpendbookError>;
}

pub fn table_rows(expenses: &[Expense]) -> Vec<TableRow> {
    expenses.iter().map(TableRow::from).collect()
}

/// Sum of all amounts. Saturates instead of overflowing on hand-edited data.
pub fn total(expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .fold(Decimal::ZERO, |sum, expense| sum.saturating_add(expense.amount))
}

/// Replaces the whole table and then the total from the given snapshot.
pub fn render_table(
    expenses: &[Expense],
    view: &mut impl TableView,
) -> Result<(), SpendbookError> {
    if expenses.is_empty() {
        view.show_placeholder(EMPTY_PLACEHOLDER)?;
    } else {
        view.replace_rows(table_rows(expenses))?;
    }
    view.set_total(&format_amount(total(expenses)))
}
