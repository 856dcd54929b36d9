//! # Metadata Errors
//!
//! Raised while building or looking up model metadata. Like field errors,
//! these are declaration problems, never reported as validation output.

use thiserror::Error;

use crate::fields::FieldError;
use crate::operation::ValidationFailed;
use crate::validation::ValidationError;

/// Result type for registry operations
pub type MetaResult<T> = Result<T, MetaError>;

/// Model metadata errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetaError {
    #[error("Model '{0}' is not registered")]
    NotRegistered(String),

    #[error("Model '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Model '{0}' has no fields")]
    NoFields(String),

    #[error("Model '{model}': field '{field}' is defined more than once")]
    DuplicateField { model: String, field: String },

    #[error("Model '{declared}' cannot be registered under the name '{supplied}'")]
    NameConflict { declared: String, supplied: String },

    #[error("Model '{0}': field list must be an array")]
    InvalidFieldList(String),

    #[error("Model '{model}': more than one primary key field ({first}, {second})")]
    MultiplePrimaryKeys {
        model: String,
        first: String,
        second: String,
    },

    #[error("Model '{model}': primary key '{field}' is not a field of the model")]
    UnknownPrimaryKey { model: String, field: String },

    #[error("Invalid '{model}' record: {reason}")]
    InvalidRecord { model: String, reason: String },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Failed to load model definition {path}: {reason}")]
    Load { path: String, reason: String },
}

impl MetaError {
    /// Create a load error for a definition file
    pub fn load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotRegistered(_) => "MODEL_NOT_REGISTERED",
            Self::AlreadyRegistered(_) => "MODEL_ALREADY_REGISTERED",
            Self::NoFields(_) => "MODEL_NO_FIELDS",
            Self::DuplicateField { .. } => "MODEL_DUPLICATE_FIELD",
            Self::NameConflict { .. } => "MODEL_NAME_CONFLICT",
            Self::InvalidFieldList(_) => "MODEL_INVALID_FIELD_LIST",
            Self::MultiplePrimaryKeys { .. } => "MODEL_MULTIPLE_PRIMARY_KEYS",
            Self::UnknownPrimaryKey { .. } => "MODEL_UNKNOWN_PRIMARY_KEY",
            Self::InvalidRecord { .. } => "MODEL_INVALID_RECORD",
            Self::Field(e) => e.code(),
            Self::Load { .. } => "MODEL_LOAD_FAILED",
        }
    }
}

/// Outcome of a failed write-path validation
#[derive(Debug, Error)]
pub enum WriteError {
    /// The record broke one or more rules
    #[error(transparent)]
    Invalid(#[from] ValidationFailed),

    /// Validation could not complete
    #[error(transparent)]
    Aborted(#[from] ValidationError),
}

impl WriteError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "MODEL_VALIDATION_FAILED",
            Self::Aborted(e) => e.code(),
        }
    }
}
