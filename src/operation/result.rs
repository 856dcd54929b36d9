//! Operation result wrapper and the validation bridge error

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::descriptor::Operation;
use crate::validation::{ErrorEntry, ModelValidationResult, ValidateResult, ValidationError};

/// Message of the error added when validation fails
pub const VALIDATION_ERROR_MESSAGE: &str = "Model failed validation";

/// Code of the error added when validation fails
pub const VALIDATION_ERROR_CODE: &str = "validation_error";

/// Outcome of one model operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOperationResult {
    operation: Operation,
    success: bool,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation: Option<ModelValidationResult>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    meta: Map<String, Value>,
}

impl ModelOperationResult {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            success: true,
            errors: Vec::new(),
            validation: None,
            meta: Map::new(),
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    pub fn validation(&self) -> Option<&ModelValidationResult> {
        self.validation.as_ref()
    }

    pub fn set_validation(&mut self, validation: ModelValidationResult) {
        self.validation = Some(validation);
    }

    /// Backend-supplied metadata, e.g. totals for a paged read
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: Value) {
        self.meta.insert(key.into(), value);
    }

    /// Record an operation error. Marks the operation as failed.
    pub fn add_error(
        &mut self,
        message: impl Into<String>,
        code: Option<&str>,
        data: Option<Value>,
    ) -> ValidateResult<()> {
        let message = message.into();
        if message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        let entry = ErrorEntry::new(message, code, data)?;

        self.success = false;
        self.errors.push(entry);
        Ok(())
    }

    /// Fail this operation with a validation report, producing the bridge
    /// error write paths return.
    pub fn into_validation_error(mut self, validation: ModelValidationResult) -> ValidationFailed {
        self.success = false;
        self.errors.push(ErrorEntry {
            message: VALIDATION_ERROR_MESSAGE.to_string(),
            code: Some(VALIDATION_ERROR_CODE.to_string()),
            data: Map::new(),
        });
        self.validation = Some(validation);
        ValidationFailed {
            result: Box::new(self),
        }
    }
}

/// Raised by write operations when the record is invalid.
///
/// The message is a fixed sentinel; the report travels on `result`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("ValidationError")]
pub struct ValidationFailed {
    result: Box<ModelOperationResult>,
}

impl ValidationFailed {
    pub fn result(&self) -> &ModelOperationResult {
        &self.result
    }

    pub fn into_result(self) -> ModelOperationResult {
        *self.result
    }

    pub fn validation(&self) -> Option<&ModelValidationResult> {
        self.result.validation()
    }

    /// Sentinel message followed by one ` * ` line per field error
    /// (`field: message`) and per model error.
    pub fn detailed_message(&self) -> String {
        let mut out = self.to_string();
        if let Some(validation) = self.validation() {
            for (field, entries) in validation.field_errors() {
                for entry in entries {
                    let _ = write!(out, "\n * {}: {}", field, entry.message);
                }
            }
            for entry in validation.model_errors() {
                let _ = write!(out, "\n * {}", entry.message);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invalid_report() -> ModelValidationResult {
        let mut validation = ModelValidationResult::new();
        validation
            .add_field_error("name", "name is required", Some("required"), None)
            .unwrap();
        validation
            .add_model_error("Field 'x' does not exist in model User", Some("extra_field"), None)
            .unwrap();
        validation
    }

    #[test]
    fn test_new_result_succeeds() {
        let result = ModelOperationResult::new(Operation::create());
        assert!(result.success());
        assert!(result.errors().is_empty());
        assert!(result.validation().is_none());
    }

    #[test]
    fn test_add_error() {
        let mut result = ModelOperationResult::new(Operation::create());
        result
            .add_error("Backend unavailable", Some("backend"), Some(json!({"retry": true})))
            .unwrap();
        assert!(!result.success());
        assert_eq!(result.errors()[0].data["retry"], json!(true));
    }

    #[test]
    fn test_add_error_rejects_bad_input() {
        let mut result = ModelOperationResult::new(Operation::create());
        assert!(matches!(
            result.add_error("", None, None),
            Err(ValidationError::MissingMessage)
        ));
        assert!(matches!(
            result.add_error("oops", None, Some(json!([1]))),
            Err(ValidationError::InvalidErrorData(_))
        ));
        assert!(result.success());
    }

    #[test]
    fn test_validation_error_bridge() {
        let failed = ModelOperationResult::new(Operation::create()).into_validation_error(invalid_report());

        assert_eq!(failed.to_string(), "ValidationError");
        assert!(!failed.result().success());
        assert_eq!(failed.result().errors().len(), 1);
        assert!(failed.result().errors()[0].has_code(VALIDATION_ERROR_CODE));
        assert!(failed.validation().unwrap().has_field_error("name", "required"));
    }

    #[test]
    fn test_detailed_message() {
        let failed = ModelOperationResult::new(Operation::create()).into_validation_error(invalid_report());
        assert_eq!(
            failed.detailed_message(),
            "ValidationError\n * name: name is required\n * Field 'x' does not exist in model User"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let failed = ModelOperationResult::new(Operation::create()).into_validation_error(invalid_report());
        let value = serde_json::to_value(failed.result()).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["operation"]["operation"], json!("create"));
        assert_eq!(value["errors"][0]["code"], json!("validation_error"));
        assert_eq!(value["validation"]["fieldErrors"]["name"][0]["code"], json!("required"));
    }
}
