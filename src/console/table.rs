use std::io::Write;

use crate::{
    errors::SpendbookError,
    render::table::{TableRow, TableView},
};

use super::{ANSI_BOLD, ANSI_DIM, ANSI_STOP};

const HEADERS: [&str; 5] = ["Date", "Description", "Category", "Amount", "ID"];

/// Prints the expense table to a writer, one full table per render.
#[derive(Debug)]
pub struct ConsoleTable<W> {
    out: W,
    currency: char,
}

impl<W: Write> ConsoleTable<W> {
    pub fn new(out: W, currency: char) -> Self {
        Self { out, currency }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn column_widths(rows: &[TableRow]) -> [usize; 5] {
    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in rows {
        let cells = [
            row.date.as_str(),
            row.description.as_str(),
            row.category.as_str(),
            row.amount.as_str(),
            row.id.as_str(),
        ];
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

impl<W: Write> TableView for ConsoleTable<W> {
    fn replace_rows(&mut self, rows: Vec<TableRow>) -> Result<(), SpendbookError> {
        let [date_w, desc_w, cat_w, amount_w, id_w] = column_widths(&rows);
        writeln!(
            self.out,
            "{ANSI_BOLD}{:date_w$}  {:desc_w$}  {:cat_w$}  {:>amount_w$}  {:id_w$}{ANSI_STOP}",
            HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3], HEADERS[4]
        )?;
        for row in &rows {
            writeln!(
                self.out,
                "{:date_w$}  {:desc_w$}  {:cat_w$}  {:>amount_w$}  {ANSI_DIM}{:id_w$}{ANSI_STOP}",
                row.date, row.description, row.category, row.amount, row.id.as_str()
            )?;
        }
        Ok(())
    }

    fn show_placeholder(&mut self, message: &str) -> Result<(), SpendbookError> {
        writeln!(self.out, "{ANSI_DIM}{message}{ANSI_STOP}")?;
        Ok(())
    }

    fn set_total(&mut self, total: &str) -> Result<(), SpendbookError> {
        writeln!(
            self.out,
            "{ANSI_BOLD}Total: {total}{}{ANSI_STOP}",
            self.currency
        )?;
        Ok(())
    }
}
