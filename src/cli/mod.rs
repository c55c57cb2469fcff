//! CLI module for compras
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP API until interrupted
//! - dump: Print one record store as JSON

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Overrides, StatusCodesArg, StoreArg};
pub use commands::{dump, dump_to, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_pretty};
