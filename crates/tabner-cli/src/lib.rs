//! Tabner CLI library.
//!
//! Core functionality for the `tabner` command-line interface: configuration
//! management, the annotate/evaluate commands, output formatting, progress
//! reporting, and the interactive REPL.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
