//! CLI argument definitions using clap
//!
//! Commands:
//! - modelmeta check --config <path>
//! - modelmeta validate --config <path> --model <name> [--operation <op>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::operation::OperationKind;

/// modelmeta - declarative model metadata and validation
#[derive(Parser, Debug)]
#[command(name = "modelmeta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and register every model definition, then list the models
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./modelmeta.json")]
        config: PathBuf,
    },

    /// Validate one JSON record read from stdin
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./modelmeta.json")]
        config: PathBuf,

        /// Model the record belongs to
        #[arg(long)]
        model: String,

        /// Operation the record is validated for
        #[arg(long, value_enum, default_value_t = OperationArg::Create)]
        operation: OperationArg,
    },
}

/// Operation names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Create,
    Read,
    Update,
    Remove,
    Exec,
}

impl From<OperationArg> for OperationKind {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Create => OperationKind::Create,
            OperationArg::Read => OperationKind::Read,
            OperationArg::Update => OperationKind::Update,
            OperationArg::Remove => OperationKind::Remove,
            OperationArg::Exec => OperationKind::Exec,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
