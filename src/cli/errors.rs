//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::registry::MetaError;
use crate::validation::ValidationError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or model definition problem
    #[error(transparent)]
    Meta(#[from] MetaError),

    /// Validation could not complete
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// stdin/stdout problem
    #[error("I/O error: {0}")]
    Io(String),

    /// Could not start the async runtime
    #[error("Startup failed: {0}")]
    Startup(String),
}

impl CliError {
    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Meta(e) => e.code(),
            Self::Validation(e) => e.code(),
            Self::Io(_) => "MODELMETA_CLI_IO_ERROR",
            Self::Startup(_) => "MODELMETA_CLI_STARTUP_FAILED",
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}
