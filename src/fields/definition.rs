//! JSON field definitions
//!
//! Shape: `{"type": "integer", "name": "age", "options": {"minValue": 0}}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{FieldError, FieldResult};
use super::field::Field;
use super::kind::FieldKind;
use super::options::FieldOptions;

/// Serialized form of a field declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub kind: String,

    /// Kept loose so a non-string name surfaces as `InvalidName`
    #[serde(default)]
    pub name: Value,

    #[serde(default)]
    pub options: Value,
}

impl FieldDef {
    /// Parse a definition from JSON
    pub fn from_value(value: Value) -> FieldResult<Self> {
        serde_json::from_value(value).map_err(|e| FieldError::InvalidDefinition(e.to_string()))
    }

    /// Build the field this definition describes
    pub fn build(self) -> FieldResult<Field> {
        let kind: FieldKind = self.kind.parse()?;
        let name = match self.name {
            Value::String(name) if !name.is_empty() => name,
            _ => return Err(FieldError::InvalidName),
        };
        let options = FieldOptions::from_value(&name, self.options)?;
        Field::new(kind, name, options)
    }
}

impl From<&Field> for FieldDef {
    fn from(field: &Field) -> Self {
        Self {
            kind: field.kind().as_str().to_string(),
            name: Value::String(field.name().to_string()),
            options: serde_json::to_value(field.options()).unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_from_json() {
        let field = FieldDef::from_value(json!({
            "type": "integer",
            "name": "age",
            "options": {"minValue": 18, "label": "Age"}
        }))
        .unwrap()
        .build()
        .unwrap();

        assert_eq!(field.kind(), FieldKind::Integer);
        assert_eq!(field.label(), "Age");
        assert_eq!(field.options().min_value, Some(18.0));
    }

    #[test]
    fn test_non_string_name_rejected() {
        let def = FieldDef::from_value(json!({"type": "text", "name": 5})).unwrap();
        assert_eq!(def.build().unwrap_err(), FieldError::InvalidName);

        let def = FieldDef::from_value(json!({"type": "text"})).unwrap();
        assert_eq!(def.build().unwrap_err(), FieldError::InvalidName);
    }

    #[test]
    fn test_unknown_type() {
        let def = FieldDef::from_value(json!({"type": "blob", "name": "data"})).unwrap();
        assert_eq!(def.build().unwrap_err(), FieldError::UnknownType("blob".into()));
    }

    #[test]
    fn test_non_object_options() {
        let def = FieldDef::from_value(json!({"type": "text", "name": "a", "options": [1]})).unwrap();
        assert_eq!(def.build().unwrap_err(), FieldError::InvalidOptions("array".into()));
    }

    #[test]
    fn test_missing_type_is_a_definition_error() {
        let err = FieldDef::from_value(json!({"name": "a"})).unwrap_err();
        assert!(matches!(err, FieldError::InvalidDefinition(_)));
        assert!(err.to_string().contains("type"));
        assert_eq!(err.code(), "MODEL_FIELD_INVALID_DEFINITION");
    }

    #[test]
    fn test_bad_option_in_definition() {
        let def = FieldDef::from_value(json!({
            "type": "text",
            "name": "title",
            "options": {"minLength": -1}
        }))
        .unwrap();
        assert!(matches!(
            def.build().unwrap_err(),
            FieldError::InvalidOption { field, .. } if field == "title"
        ));
    }

    #[test]
    fn test_definition_from_field() {
        let field = Field::text("title", FieldOptions::new().max_length(80)).unwrap();
        let def = FieldDef::from(&field);
        assert_eq!(def.kind, "text");
        assert_eq!(def.options["maxLength"], json!(80));

        let rebuilt = def.build().unwrap();
        assert_eq!(rebuilt.options(), field.options());
    }
}
