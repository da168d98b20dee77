//! CLI command implementations for herakles-task-filter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `filter`: Snapshot filtering
//! - `generate`: Synthetic snapshot generation
//! - `config`: Configuration file generation
//! - `check`: Configuration and snapshot validation

pub mod check;
pub mod config;
pub mod filter;
pub mod generate;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use filter::command_filter;
pub use generate::command_generate;
