//! CLI module for schemaform
//!
//! Provides command-line interface for:
//! - describe: Print what a schema binds to
//! - check: Bind, validate and report a model

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, describe, run, run_command, CheckRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json, write_response};
