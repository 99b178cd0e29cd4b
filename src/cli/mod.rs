//! CLI module for clientdesk
//!
//! Provides command-line interface for:
//! - serve: connect to the store and serve the record pages
//! - init-schema: create any missing tables

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, HttpArgs, StoreArgs};
pub use commands::{init_schema, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
