//! Expense Analyst - LLM-assisted analysis of monthly expense statements
//!
//! Core library providing PDF text extraction, the analysis pipeline,
//! session state and the terminal UI.

pub mod cli;
pub mod config;
pub mod core;
pub mod ingestion;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
