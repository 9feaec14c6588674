//! CLI module
//!
//! Command-line interface for inspecting marketplace client configuration.
//!
//! # Commands
//!
//! - `validate` - Load and validate a config file
//! - `schedule` - Show the polling wait schedule and retry backoff sequence

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
