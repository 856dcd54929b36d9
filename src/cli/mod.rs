//! CLI module for modelmeta
//!
//! Provides command-line interface for:
//! - check: Load model definitions and list registered models
//! - validate: Validate a JSON record read from stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, OperationArg};
pub use commands::{check, execute, load_manager, run, run_command, validate};
pub use errors::{CliError, CliResult};
pub use io::{error_response, ok_response, read_document, write_line};
