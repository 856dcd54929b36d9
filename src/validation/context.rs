//! Per-run validation options and the context handed to validators

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::Field;
use crate::operation::Operation;
use crate::record::{FieldValue, Record};
use crate::registry::ModelManager;

/// Default deadline for a validation run
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Per-call validation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Deadline for the whole run, in milliseconds (default: 5000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Restrict validation to these fields. Disables the extra-field scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            fields: None,
        }
    }
}

impl ValidationOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// True if `field_name` is in scope for this run
    pub fn includes(&self, field_name: &str) -> bool {
        self.fields
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == field_name))
    }
}

/// Everything a field validator may read.
///
/// Validators only read through this; they write to the result they are
/// handed alongside it.
#[derive(Clone, Copy)]
pub struct ValidatorContext<'a> {
    pub manager: &'a ModelManager,
    pub record: &'a Record,
    pub field: &'a Field,
    pub operation: &'a Operation,
    pub options: &'a ValidationOptions,
}

impl<'a> ValidatorContext<'a> {
    /// The field's value on the record, `None` when unset
    pub fn value(&self) -> Option<&'a FieldValue> {
        self.record.get(self.field.name())
    }

    /// The field's plain data, `None` when unset or a linked record
    pub fn data(&self) -> Option<&'a Value> {
        self.record.get_data(self.field.name())
    }

    pub fn field_name(&self) -> &'a str {
        self.field.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_timeout() {
        let options = ValidationOptions::default();
        assert_eq!(options.timeout_ms, 5000);
        assert_eq!(options.timeout(), Duration::from_millis(5000));
        assert!(options.fields.is_none());
    }

    #[test]
    fn test_field_scope() {
        let options = ValidationOptions::default().with_fields(["name"]);
        assert!(options.includes("name"));
        assert!(!options.includes("age"));

        assert!(ValidationOptions::default().includes("anything"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let options: ValidationOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, ValidationOptions::default());

        let options: ValidationOptions =
            serde_json::from_value(json!({"timeoutMs": 250, "fields": ["a"]})).unwrap();
        assert_eq!(options.timeout_ms, 250);
        assert_eq!(options.fields, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_with_timeout() {
        let options = ValidationOptions::default().with_timeout(Duration::from_millis(40));
        assert_eq!(options.timeout_ms, 40);
    }
}
