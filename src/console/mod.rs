use inquire::Confirm;

use crate::{
    app::{Alert, Confirmation},
    errors::SpendbookError,
};

pub mod chart;
pub mod form;
pub mod table;

pub const ANSI_RED: &str = "\x1b[31m";
pub const ANSI_BOLD: &str = "\x1b[1m";
pub const ANSI_DIM: &str = "\x1b[2m";
pub const ANSI_STOP: &str = "\x1b[0m";

/// Prints alerts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlert;

impl Alert for ConsoleAlert {
    fn alert(&mut self, message: &str) {
        eprintln!("{ANSI_RED}{message}{ANSI_STOP}");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InquireConfirm;

impl Confirmation for InquireConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, SpendbookError> {
        Ok(Confirm::new(prompt).with_default(false).prompt()?)
    }
}
