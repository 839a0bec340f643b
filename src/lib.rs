pub mod app;
pub mod config;
pub mod console;
pub mod errors;
pub mod expenses;
pub mod parse;
pub mod render;
pub mod storage;
