//! # Field Errors
//!
//! Construction errors are programmer errors in a model declaration.
//! They are raised synchronously and never reported as validation output.

use thiserror::Error;

/// Result type for field construction
pub type FieldResult<T> = Result<T, FieldError>;

/// Field construction and conversion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Field name must be a non-empty string")]
    InvalidName,

    #[error("Field options must be an object, got {0}")]
    InvalidOptions(String),

    #[error("Field '{field}': invalid option: {reason}")]
    InvalidOption { field: String, reason: String },

    #[error("Invalid field definition: {0}")]
    InvalidDefinition(String),

    #[error("Field '{field}': selection must be a list of [value, label] pairs")]
    InvalidSelection { field: String },

    #[error("Field '{field}': 'model' option must name a model")]
    InvalidRelatedModel { field: String },

    #[error("Field '{field}': 'field' option must name the back-reference field")]
    InvalidBackReference { field: String },

    #[error("Field '{field}': invalid regex '{pattern}': {reason}")]
    InvalidRegex {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("Field '{0}' holds a record list and cannot be converted to a backend value")]
    Unserializable(String),

    #[error("Unknown field type: {0}")]
    UnknownType(String),
}

impl FieldError {
    /// Stable machine code for this error
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::InvalidName => "MODEL_FIELD_INVALID_NAME",
            FieldError::InvalidOptions(_) => "MODEL_FIELD_INVALID_OPTIONS",
            FieldError::InvalidOption { .. } => "MODEL_FIELD_INVALID_OPTION",
            FieldError::InvalidDefinition(_) => "MODEL_FIELD_INVALID_DEFINITION",
            FieldError::InvalidSelection { .. } => "MODEL_FIELD_INVALID_SELECTION",
            FieldError::InvalidRelatedModel { .. } => "MODEL_FIELD_INVALID_MODEL",
            FieldError::InvalidBackReference { .. } => "MODEL_FIELD_INVALID_BACK_REFERENCE",
            FieldError::InvalidRegex { .. } => "MODEL_FIELD_INVALID_REGEX",
            FieldError::Unserializable(_) => "MODEL_FIELD_UNSERIALIZABLE",
            FieldError::UnknownType(_) => "MODEL_FIELD_UNKNOWN_TYPE",
        }
    }
}
