//! Field option bag
//!
//! Options are layered: a field kind supplies its defaults, caller-supplied
//! options are merged over them. Unset options stay `None` so the merge can
//! tell "not given" apart from "given as false".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{FieldError, FieldResult};

/// Options accepted by every field kind.
///
/// Kind-specific knobs (`min_length`, `selection`, `model`, ...) are ignored
/// by kinds that do not use them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    /// Whether a value must be set (resolves to `true` when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Display label for UI collaborators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Marks the model's primary key field
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,

    /// Whether the backend persists this field (resolves to `true` when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored: Option<bool>,

    /// Value assigned to new records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    /// Pattern text values must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// `(value, label)` pairs for selection fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Vec<(String, String)>>,

    /// Linked model name for related-record fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Back-reference field name for related-record lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON value.
    ///
    /// `null` means "no options". Anything else must be an object, and a
    /// `selection` entry must be a list of two-element string lists.
    pub fn from_value(field_name: &str, value: Value) -> FieldResult<Self> {
        let mut map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => return Err(FieldError::InvalidOptions(json_type_name(&other).into())),
        };

        let selection = match map.remove("selection") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(parse_selection(field_name, &raw)?),
        };

        let mut options: FieldOptions = serde_json::from_value(Value::Object(map))
            .map_err(|e| FieldError::InvalidOption {
                field: field_name.to_string(),
                reason: e.to_string(),
            })?;
        options.selection = selection;
        Ok(options)
    }

    /// Merge `self` over `base`: every option set here wins.
    pub fn layered_over(self, base: FieldOptions) -> FieldOptions {
        FieldOptions {
            required: self.required.or(base.required),
            label: self.label.or(base.label),
            primary_key: self.primary_key || base.primary_key,
            stored: self.stored.or(base.stored),
            default: self.default.or(base.default),
            min_length: self.min_length.or(base.min_length),
            max_length: self.max_length.or(base.max_length),
            min_value: self.min_value.or(base.min_value),
            max_value: self.max_value.or(base.max_value),
            regex: self.regex.or(base.regex),
            selection: self.selection.or(base.selection),
            model: self.model.or(base.model),
            field: self.field.or(base.field),
        }
    }

    /// Resolved `required` flag
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true)
    }

    /// Resolved `stored` flag
    pub fn is_stored(&self) -> bool {
        self.stored.unwrap_or(true)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn stored(mut self, stored: bool) -> Self {
        self.stored = Some(stored);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn selection<V, L>(mut self, pairs: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        self.selection = Some(
            pairs
                .into_iter()
                .map(|(value, label)| (value.into(), label.into()))
                .collect(),
        );
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn back_reference(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

fn parse_selection(field_name: &str, raw: &Value) -> FieldResult<Vec<(String, String)>> {
    let invalid = || FieldError::InvalidSelection {
        field: field_name.to_string(),
    };

    let entries = raw.as_array().ok_or_else(invalid)?;
    entries
        .iter()
        .map(|entry| match entry.as_array().map(Vec::as_slice) {
            Some([Value::String(value), Value::String(label)]) => {
                Ok((value.clone(), label.clone()))
            }
            _ => Err(invalid()),
        })
        .collect()
}

/// JSON type name used in error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolved_defaults() {
        let options = FieldOptions::new();
        assert!(options.is_required());
        assert!(options.is_stored());
        assert!(!options.primary_key);
    }

    #[test]
    fn test_layering_prefers_supplied_options() {
        let base = FieldOptions::new().required(false).label("Base");
        let merged = FieldOptions::new().label("Mine").layered_over(base);

        assert_eq!(merged.required, Some(false));
        assert_eq!(merged.label.as_deref(), Some("Mine"));
    }

    #[test]
    fn test_from_value_parses_camel_case() {
        let options = FieldOptions::from_value(
            "age",
            json!({"required": false, "minValue": 18, "primaryKey": true}),
        )
        .unwrap();

        assert_eq!(options.required, Some(false));
        assert_eq!(options.min_value, Some(18.0));
        assert!(options.primary_key);
    }

    #[test]
    fn test_from_value_null_is_empty() {
        let options = FieldOptions::from_value("x", Value::Null).unwrap();
        assert_eq!(options, FieldOptions::default());
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = FieldOptions::from_value("x", json!("required")).unwrap_err();
        assert_eq!(err, FieldError::InvalidOptions("string".into()));
    }

    #[test]
    fn test_bad_option_value_names_the_field() {
        let err = FieldOptions::from_value("title", json!({"minLength": -1})).unwrap_err();
        assert!(matches!(err, FieldError::InvalidOption { ref field, .. } if field == "title"));
        assert_eq!(err.code(), "MODEL_FIELD_INVALID_OPTION");
        assert!(!err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_selection_pairs() {
        let options = FieldOptions::from_value(
            "status",
            json!({"selection": [["open", "Open"], ["closed", "Closed"]]}),
        )
        .unwrap();

        assert_eq!(
            options.selection,
            Some(vec![
                ("open".to_string(), "Open".to_string()),
                ("closed".to_string(), "Closed".to_string()),
            ])
        );
    }

    #[test]
    fn test_malformed_selection_rejected() {
        for bad in [
            json!("open"),
            json!(["open", "closed"]),
            json!([["open"]]),
            json!([["open", "Open", "extra"]]),
            json!([["open", 1]]),
        ] {
            let err = FieldOptions::from_value("status", json!({ "selection": bad })).unwrap_err();
            assert!(matches!(err, FieldError::InvalidSelection { .. }));
        }
    }
}
