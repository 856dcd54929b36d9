//! Validation result and structured error literals
//!
//! A `ModelValidationResult` starts valid and flips to invalid the first
//! time any error is recorded. It never flips back. All mutation is
//! append-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{ValidateResult, ValidationError};
use crate::fields::options::json_type_name;

/// A structured error literal: `{ message, code?, ...data }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ErrorEntry {
    /// Build an entry. Extra data, when given, must be a JSON object.
    pub fn new(
        message: impl Into<String>,
        code: Option<&str>,
        data: Option<Value>,
    ) -> ValidateResult<Self> {
        let data = match data {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ValidationError::InvalidErrorData(
                    json_type_name(&other).into(),
                ))
            }
        };

        Ok(Self {
            message: message.into(),
            code: code.map(str::to_string),
            data,
        })
    }

    /// Returns true if this entry carries the given code
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

/// Outcome of one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelValidationResult {
    valid: bool,
    field_errors: BTreeMap<String, Vec<ErrorEntry>>,
    model_errors: Vec<ErrorEntry>,
}

impl Default for ModelValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelValidationResult {
    /// Creates an empty, valid result
    pub fn new() -> Self {
        Self::with_valid(true)
    }

    /// Creates an empty result pre-seeded as valid or invalid
    pub fn with_valid(valid: bool) -> Self {
        Self {
            valid,
            field_errors: BTreeMap::new(),
            model_errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Field errors keyed by field name
    pub fn field_errors(&self) -> &BTreeMap<String, Vec<ErrorEntry>> {
        &self.field_errors
    }

    /// Errors recorded for one field (empty if none)
    pub fn errors_for(&self, field_name: &str) -> &[ErrorEntry] {
        self.field_errors
            .get(field_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn model_errors(&self) -> &[ErrorEntry] {
        &self.model_errors
    }

    /// Returns true if `field_name` has an error with `code`
    pub fn has_field_error(&self, field_name: &str, code: &str) -> bool {
        self.errors_for(field_name).iter().any(|e| e.has_code(code))
    }

    /// Returns true if a model-level error with `code` was recorded
    pub fn has_model_error(&self, code: &str) -> bool {
        self.model_errors.iter().any(|e| e.has_code(code))
    }

    /// Total number of field and model errors
    pub fn error_count(&self) -> usize {
        self.field_errors.values().map(Vec::len).sum::<usize>() + self.model_errors.len()
    }

    /// Record an error against a field.
    pub fn add_field_error(
        &mut self,
        field_name: &str,
        message: impl Into<String>,
        code: Option<&str>,
        data: Option<Value>,
    ) -> ValidateResult<()> {
        if field_name.is_empty() {
            return Err(ValidationError::MissingFieldName);
        }
        let entry = ErrorEntry::new(message, code, data)?;

        self.valid = false;
        self.field_errors
            .entry(field_name.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    /// Record an error against the model as a whole.
    pub fn add_model_error(
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

        self.valid = false;
        self.model_errors.push(entry);
        Ok(())
    }

    /// Append every error from `other`, keeping its order.
    pub(crate) fn merge(&mut self, other: ModelValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        for (field, entries) in other.field_errors {
            self.field_errors.entry(field).or_default().extend(entries);
        }
        self.model_errors.extend(other.model_errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_result_is_valid() {
        let result = ModelValidationResult::new();
        assert!(result.is_valid());
        assert_eq!(result.error_count(), 0);
    }

    #[test]
    fn test_preseeded_invalid() {
        let result = ModelValidationResult::with_valid(false);
        assert!(!result.is_valid());
        assert_eq!(result.error_count(), 0);
    }

    #[test]
    fn test_field_error_flips_valid() {
        let mut result = ModelValidationResult::new();
        result
            .add_field_error("name", "This field is required", Some("required"), None)
            .unwrap();

        assert!(!result.is_valid());
        assert!(result.has_field_error("name", "required"));
        assert_eq!(result.errors_for("name").len(), 1);
    }

    #[test]
    fn test_field_errors_keep_order() {
        let mut result = ModelValidationResult::new();
        result.add_field_error("name", "first", Some("a"), None).unwrap();
        result.add_field_error("name", "second", Some("b"), None).unwrap();

        let messages: Vec<_> = result
            .errors_for("name")
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let mut result = ModelValidationResult::new();
        let err = result.add_field_error("", "msg", None, None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingFieldName));
        assert!(result.is_valid());
    }

    #[test]
    fn test_empty_model_message_rejected() {
        let mut result = ModelValidationResult::new();
        let err = result.add_model_error("", None, None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingMessage));
        assert!(result.is_valid());
    }

    #[test]
    fn test_non_object_data_rejected() {
        let mut result = ModelValidationResult::new();
        let err = result
            .add_field_error("name", "msg", None, Some(json!("oops")))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidErrorData(_)));

        let err = result
            .add_model_error("msg", None, Some(json!([1, 2])))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidErrorData(_)));
        assert!(result.is_valid());
    }

    #[test]
    fn test_error_literal_shape() {
        let mut result = ModelValidationResult::new();
        result
            .add_model_error("Extra field 'x'", Some("extra_field"), Some(json!({"field": "x"})))
            .unwrap();

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["valid"], json!(false));
        assert_eq!(
            value["modelErrors"][0],
            json!({"message": "Extra field 'x'", "code": "extra_field", "field": "x"})
        );
    }

    #[test]
    fn test_merge_appends_and_invalidates() {
        let mut main = ModelValidationResult::new();
        main.add_field_error("a", "one", Some("x"), None).unwrap();

        let mut other = ModelValidationResult::new();
        other.add_field_error("a", "two", Some("y"), None).unwrap();
        other.add_model_error("model", Some("z"), None).unwrap();

        main.merge(other);
        assert_eq!(main.errors_for("a").len(), 2);
        assert_eq!(main.errors_for("a")[1].message, "two");
        assert!(main.has_model_error("z"));
    }

    #[test]
    fn test_merge_valid_keeps_valid() {
        let mut main = ModelValidationResult::new();
        main.merge(ModelValidationResult::new());
        assert!(main.is_valid());
    }
}
