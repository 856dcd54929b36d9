//! Field declarations
//!
//! A `Field` is immutable once built. Its validator list is resolved from
//! its kind and options at construction time.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::errors::{FieldError, FieldResult};
use super::kind::FieldKind;
use super::options::FieldOptions;
use crate::operation::Operation;
use crate::record::{FieldValue, Record};
use crate::registry::{MetaResult, ModelManager};
use crate::validation::orchestrator::{run_async_validators, with_deadline};
use crate::validation::validators::{AsyncValidator, Validator};
use crate::validation::{
    ModelValidationResult, ValidateResult, ValidationError, ValidationOptions, ValidatorContext,
};

/// A named, typed attribute of a model
#[derive(Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    options: FieldOptions,
    pattern: Option<Regex>,
    validators: Vec<Validator>,
    async_validators: Vec<Arc<dyn AsyncValidator>>,
}

impl Field {
    /// Build a field of the given kind.
    ///
    /// Caller options are layered over the kind's defaults. Fails on an
    /// empty name or options the kind cannot use.
    pub fn new(kind: FieldKind, name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(FieldError::InvalidName);
        }

        let mut options = options.layered_over(kind.default_options());
        if kind == FieldKind::AutoNumber {
            options.required = Some(false);
        }
        kind.check_options(&name, &options)?;

        let pattern = compile_pattern(kind, &name, &options)?;
        let validators = kind.validators(&options, pattern.is_some());

        Ok(Self {
            name,
            kind,
            options,
            pattern,
            validators,
            async_validators: Vec::new(),
        })
    }

    pub fn text(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Text, name, options)
    }

    pub fn email(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Email, name, options)
    }

    pub fn url(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Url, name, options)
    }

    pub fn number(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Number, name, options)
    }

    pub fn integer(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Integer, name, options)
    }

    pub fn auto_number(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::AutoNumber, name, options)
    }

    pub fn boolean(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Boolean, name, options)
    }

    pub fn select(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Select, name, options)
    }

    pub fn multi_select(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::MultiSelect, name, options)
    }

    pub fn date(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Date, name, options)
    }

    pub fn time(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Time, name, options)
    }

    pub fn datetime(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::DateTime, name, options)
    }

    pub fn related(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::Related, name, options)
    }

    pub fn related_list(name: impl Into<String>, options: FieldOptions) -> FieldResult<Self> {
        Self::new(FieldKind::RelatedList, name, options)
    }

    /// Append a custom synchronous validator after the built-in ones
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Append a custom asynchronous validator
    pub fn with_async_validator(mut self, validator: impl AsyncValidator + 'static) -> Self {
        self.async_validators.push(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Display label, falling back to the field name
    pub fn label(&self) -> &str {
        self.options.label.as_deref().unwrap_or(&self.name)
    }

    pub fn is_required(&self) -> bool {
        self.options.is_required()
    }

    pub fn is_stored(&self) -> bool {
        self.options.is_stored()
    }

    pub fn is_primary_key(&self) -> bool {
        self.options.primary_key
    }

    /// Compiled pattern for text-like fields
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Linked model name for related fields
    pub fn related_model(&self) -> Option<&str> {
        if self.kind.is_related() {
            self.options.model.as_deref()
        } else {
            None
        }
    }

    /// Label of a selection value, `None` if the value is not an option
    pub fn selection_label(&self, value: &str) -> Option<&str> {
        self.options
            .selection
            .as_ref()?
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, label)| label.as_str())
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn async_validators(&self) -> &[Arc<dyn AsyncValidator>] {
        &self.async_validators
    }

    /// Value assigned to this field on a new record
    pub fn default_value(&self) -> Option<&Value> {
        self.options.default.as_ref()
    }

    /// Run the synchronous validators in declaration order.
    pub(crate) fn run_sync_validators(
        &self,
        ctx: &ValidatorContext<'_>,
        result: &mut ModelValidationResult,
    ) -> ValidateResult<()> {
        for validator in &self.validators {
            validator.run(ctx, result)?;
        }
        Ok(())
    }

    /// Validate this field alone.
    ///
    /// Runs the synchronous validators, then the asynchronous ones, writing
    /// into `result`. The run is bounded by the options' deadline.
    pub async fn validate(
        &self,
        manager: &ModelManager,
        record: &Record,
        operation: &Operation,
        mut result: ModelValidationResult,
        options: Option<&ValidationOptions>,
    ) -> ValidateResult<ModelValidationResult> {
        let defaults = ValidationOptions::default();
        let options = options.unwrap_or(&defaults);
        let ctx = ValidatorContext {
            manager,
            record,
            field: self,
            operation,
            options,
        };

        let work = async move {
            self.run_sync_validators(&ctx, &mut result)?;
            result.merge(run_async_validators(std::slice::from_ref(&ctx)).await?);
            Ok::<_, ValidationError>(result)
        };
        with_deadline(options.timeout(), work).await
    }

    /// Convert this field's value on `record` to what a backend stores.
    ///
    /// Related fields store the linked record's primary key value. Record
    /// lists are not stored by value and fail to convert.
    pub fn to_backend_value(&self, manager: &ModelManager, record: &Record) -> MetaResult<Value> {
        match (self.kind, record.get(&self.name)) {
            (FieldKind::RelatedList, _) | (_, Some(FieldValue::Records(_))) => {
                Err(FieldError::Unserializable(self.name.clone()).into())
            }
            (_, None) => Ok(Value::Null),
            (_, Some(FieldValue::Record(linked))) => {
                let meta = manager.get_model_meta(linked.model())?;
                Ok(meta
                    .primary_key()
                    .and_then(|pk| linked.get_data(pk))
                    .cloned()
                    .unwrap_or(Value::Null))
            }
            (_, Some(FieldValue::Data(value))) => Ok(value.clone()),
        }
    }

    /// Convert a backend value back into a record value
    pub fn from_backend_value(&self, value: Value) -> FieldValue {
        FieldValue::Data(value)
    }
}

fn compile_pattern(kind: FieldKind, name: &str, options: &FieldOptions) -> FieldResult<Option<Regex>> {
    let compile = |pattern: &str| {
        Regex::new(pattern).map_err(|e| FieldError::InvalidRegex {
            field: name.to_string(),
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
    };

    match (options.regex.as_deref(), kind.default_pattern()) {
        (None, None) => Ok(None),
        (Some(pattern), None) => compile(pattern).map(Some),
        (None, Some(fallback)) => compile(fallback).map(Some),
        // A bad override on email and URL fields keeps the built-in pattern
        (Some(pattern), Some(fallback)) => match compile(pattern) {
            Ok(regex) => Ok(Some(regex)),
            Err(e) => {
                warn!(field = name, error = %e, "ignoring invalid regex override");
                compile(fallback).map(Some)
            }
        },
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let async_names: Vec<&str> = self.async_validators.iter().map(|v| v.name()).collect();
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("validators", &self.validators)
            .field("async_validators", &async_names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator_names(field: &Field) -> Vec<&'static str> {
        field.validators().iter().map(Validator::name).collect()
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            Field::text("", FieldOptions::new()).unwrap_err(),
            FieldError::InvalidName
        );
    }

    #[test]
    fn test_required_by_default() {
        let field = Field::text("name", FieldOptions::new()).unwrap();
        assert!(field.is_required());
        assert!(field.is_stored());
        assert_eq!(validator_names(&field), vec!["required", "string", "string_empty"]);
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let field = Field::text("name", FieldOptions::new()).unwrap();
        assert_eq!(field.label(), "name");
        let field = Field::text("name", FieldOptions::new().label("Full Name")).unwrap();
        assert_eq!(field.label(), "Full Name");
    }

    #[test]
    fn test_auto_number_never_required() {
        let field = Field::auto_number("id", FieldOptions::new().required(true)).unwrap();
        assert!(!field.is_required());
        assert_eq!(validator_names(&field), vec!["number", "integer"]);
    }

    #[test]
    fn test_related_list_optional_unless_overridden() {
        let options = FieldOptions::new().model("Post").back_reference("author");
        let field = Field::related_list("posts", options.clone()).unwrap();
        assert!(!field.is_required());

        let field = Field::related_list("posts", options.required(true)).unwrap();
        assert!(field.is_required());
    }

    #[test]
    fn test_invalid_regex_rejected_on_text() {
        let err = Field::text("code", FieldOptions::new().regex("(")).unwrap_err();
        assert!(matches!(err, FieldError::InvalidRegex { .. }));
    }

    #[test]
    fn test_email_keeps_default_pattern_on_bad_override() {
        let field = Field::email("email", FieldOptions::new().regex("(")).unwrap();
        let pattern = field.pattern().unwrap();
        assert!(pattern.is_match("someone@example.com"));
        assert!(!pattern.is_match("not an email"));
    }

    #[test]
    fn test_valid_override_replaces_default_pattern() {
        let field = Field::email("e", FieldOptions::new().regex("^x@y$")).unwrap();
        let pattern = field.pattern().unwrap();
        assert!(pattern.is_match("x@y"));
        assert!(!pattern.is_match("someone@example.com"));

        let field = Field::url("site", FieldOptions::new().regex("^internal:")).unwrap();
        assert!(field.pattern().unwrap().is_match("internal:home"));
        assert!(!field.pattern().unwrap().is_match("https://example.com"));
    }

    #[test]
    fn test_url_pattern() {
        let field = Field::url("site", FieldOptions::new()).unwrap();
        let pattern = field.pattern().unwrap();
        assert!(pattern.is_match("https://example.com/path"));
        assert!(!pattern.is_match("example dot com"));
    }

    #[test]
    fn test_selection_label() {
        let field = Field::select(
            "status",
            FieldOptions::new().selection([("open", "Open"), ("done", "Done")]),
        )
        .unwrap();
        assert_eq!(field.selection_label("done"), Some("Done"));
        assert_eq!(field.selection_label("nope"), None);
    }

    #[test]
    fn test_related_model_only_on_related_kinds() {
        let field = Field::text("t", FieldOptions::new().model("Other")).unwrap();
        assert_eq!(field.related_model(), None);
        let field = Field::related("company", FieldOptions::new().model("Company")).unwrap();
        assert_eq!(field.related_model(), Some("Company"));
    }

    #[test]
    fn test_custom_validator_appended() {
        fn always_ok(
            _ctx: &ValidatorContext<'_>,
            _result: &mut ModelValidationResult,
        ) -> ValidateResult<()> {
            Ok(())
        }

        let field = Field::number("n", FieldOptions::new())
            .unwrap()
            .with_validator(Validator::new("always_ok", always_ok));
        assert_eq!(validator_names(&field), vec!["required", "number", "always_ok"]);
    }

    #[test]
    fn test_backend_value_of_plain_field() {
        let manager = ModelManager::new();
        let field = Field::text("name", FieldOptions::new()).unwrap();
        let record = Record::new("User").with("name", "Ann");
        assert_eq!(field.to_backend_value(&manager, &record).unwrap(), json!("Ann"));
        assert_eq!(
            field.from_backend_value(json!("Ann")),
            FieldValue::Data(json!("Ann"))
        );
    }

    #[test]
    fn test_record_list_is_unserializable() {
        let manager = ModelManager::new();
        let field = Field::related_list(
            "posts",
            FieldOptions::new().model("Post").back_reference("author"),
        )
        .unwrap();
        let record = Record::new("User");
        let err = field.to_backend_value(&manager, &record).unwrap_err();
        assert_eq!(err.code(), "MODEL_FIELD_UNSERIALIZABLE");
    }

    #[tokio::test]
    async fn test_standalone_validate() {
        let manager = ModelManager::new();
        let operation = Operation::create();
        let field = Field::integer("age", FieldOptions::new().min_value(18.0)).unwrap();
        let record = Record::new("User").with("age", 12);

        let result = field
            .validate(&manager, &record, &operation, ModelValidationResult::new(), None)
            .await
            .unwrap();
        assert!(!result.is_valid());
        assert!(result.has_field_error("age", "min_value"));
    }
}
