//! CLI command handlers

pub mod commands;

pub use commands::{layout, preview, process_file};
