//! CLI module for deepcheck
//!
//! Provides the command-line interface:
//! - verify: one-shot claim verification
//! - analyze: one-shot media analysis
//! - cycle: run one detection cycle
//! - monitor: run detection cycles continuously

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{read_content_items, write_json};
