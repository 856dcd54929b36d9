//! # Validation Errors
//!
//! A `ValidationError` means validation itself could not complete. Invalid
//! data is never reported through this type; it lands in a
//! `ModelValidationResult` with `valid == false`.

use thiserror::Error;

use crate::registry::MetaError;

/// Result type for validation runs
pub type ValidateResult<T> = Result<T, ValidationError>;

/// Orchestration failures and misuse of the error accumulators
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Validation timed out after {0} milliseconds")]
    Timeout(u64),

    #[error("Model hook failed: {0}")]
    HookFailed(String),

    #[error("Validator '{validator}' failed on field '{field}': {message}")]
    ValidatorFailed {
        validator: String,
        field: String,
        message: String,
    },

    #[error("Model '{0}' has no primary key")]
    NoPrimaryKey(String),

    #[error("Field name must not be empty")]
    MissingFieldName,

    #[error("Error message must not be empty")]
    MissingMessage,

    #[error("Error data must be a plain object, got {0}")]
    InvalidErrorData(String),

    #[error(transparent)]
    Meta(#[from] MetaError),
}

impl ValidationError {
    /// Create a hook failure
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::HookFailed(msg.into())
    }

    /// Create a validator failure
    pub fn validator(
        validator: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ValidatorFailed {
            validator: validator.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "MODEL_VALIDATION_TIMEOUT",
            Self::HookFailed(_) => "MODEL_VALIDATION_HOOK_FAILED",
            Self::ValidatorFailed { .. } => "MODEL_VALIDATOR_FAILED",
            Self::NoPrimaryKey(_) => "MODEL_NO_PRIMARY_KEY",
            Self::MissingFieldName => "MODEL_ERROR_MISSING_FIELD_NAME",
            Self::MissingMessage => "MODEL_ERROR_MISSING_MESSAGE",
            Self::InvalidErrorData(_) => "MODEL_ERROR_INVALID_DATA",
            Self::Meta(e) => e.code(),
        }
    }

    /// True when the run was cut off by its deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = ValidationError::Timeout(5000);
        assert_eq!(
            err.to_string(),
            "Validation timed out after 5000 milliseconds"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_meta_error_code_passthrough() {
        let err: ValidationError = MetaError::NotRegistered("User".into()).into();
        assert_eq!(err.code(), "MODEL_NOT_REGISTERED");
        assert!(err.to_string().contains("User"));
    }

    #[test]
    fn test_validator_failure_display() {
        let err = ValidationError::validator("unique", "email", "backend unavailable");
        let msg = err.to_string();
        assert!(msg.contains("unique"));
        assert!(msg.contains("email"));
        assert!(msg.contains("backend unavailable"));
    }
}
