//! Registered models and the validation entry points
//!
//! Registration is single-assignment per model name. Lookups hand out
//! shared metadata; registered metadata is never mutated.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::errors::{MetaError, MetaResult, WriteError};
use super::meta::ModelMeta;
use crate::config::ManagerConfig;
use crate::fields::FieldKind;
use crate::operation::{ModelOperationResult, Operation};
use crate::record::{FieldValue, Record};
use crate::validation::{validate_record, ModelValidationResult, ValidateResult, ValidationOptions};

/// Registry of model metadata
#[derive(Debug, Default)]
pub struct ModelManager {
    models: BTreeMap<String, Arc<ModelMeta>>,
    config: ManagerConfig,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        Self {
            models: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Validation options used when a call passes none
    pub fn default_options(&self) -> &ValidationOptions {
        &self.config.validation
    }

    /// Register finalized metadata. Each model name may be registered once.
    pub fn register(&mut self, meta: ModelMeta) -> MetaResult<Arc<ModelMeta>> {
        if self.models.contains_key(meta.name()) {
            return Err(MetaError::AlreadyRegistered(meta.name().to_string()));
        }

        let meta = Arc::new(meta.with_default_storage(&self.config.default_storage));
        debug!(
            model = meta.name(),
            fields = meta.fields().len(),
            storage = meta.storage(),
            "registered model"
        );
        self.models.insert(meta.name().to_string(), Arc::clone(&meta));
        Ok(meta)
    }

    pub fn is_registered(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    pub fn get_model_meta(&self, model: &str) -> MetaResult<Arc<ModelMeta>> {
        self.models
            .get(model)
            .cloned()
            .ok_or_else(|| MetaError::NotRegistered(model.to_string()))
    }

    /// Registered model names in sorted order
    pub fn model_names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// Build a record of `model` from JSON.
    ///
    /// Objects under related fields become linked records of the related
    /// model, and arrays of objects under record-list fields become record
    /// lists. Everything else stays plain data.
    pub fn record_from_json(&self, model: &str, data: Value) -> MetaResult<Record> {
        let meta = self.get_model_meta(model)?;
        let plain = Record::from_json(model, data)?;

        let mut record = Record::new(model);
        for name in plain.property_names() {
            let Some(FieldValue::Data(value)) = plain.get(name) else {
                record.set(name, Value::Null);
                continue;
            };
            let field = meta.field(name);
            match (field.map(|f| (f.kind(), f.related_model())), value) {
                (Some((FieldKind::Related, Some(related))), Value::Object(_)) => {
                    record.set_record(name, self.linked_record(related, value.clone())?);
                }
                (Some((FieldKind::RelatedList, Some(related))), Value::Array(items))
                    if items.iter().all(Value::is_object) && !items.is_empty() =>
                {
                    let linked = items
                        .iter()
                        .map(|item| self.linked_record(related, item.clone()))
                        .collect::<MetaResult<Vec<_>>>()?;
                    record.set_records(name, linked);
                }
                _ => record.set(name, value.clone()),
            }
        }
        Ok(record)
    }

    /// Linked records of unregistered models stay plain; validation reports them
    fn linked_record(&self, model: &str, data: Value) -> MetaResult<Record> {
        if self.is_registered(model) {
            self.record_from_json(model, data)
        } else {
            Record::from_json(model, data)
        }
    }

    /// Validate a record against its registered model
    pub async fn validate(
        &self,
        record: &Record,
        operation: &Operation,
        options: Option<&ValidationOptions>,
    ) -> ValidateResult<ModelValidationResult> {
        validate_record(self, record, operation, options).await
    }

    /// Validate a record about to be written.
    ///
    /// A valid record yields the operation result carrying the report. An
    /// invalid one yields the bridge error wrapping that result.
    pub async fn validate_for_write(
        &self,
        record: &Record,
        operation: &Operation,
        options: Option<&ValidationOptions>,
    ) -> Result<ModelOperationResult, WriteError> {
        let validation = self.validate(record, operation, options).await?;

        let mut outcome = ModelOperationResult::new(operation.clone());
        if validation.is_valid() {
            outcome.set_validation(validation);
            Ok(outcome)
        } else {
            Err(WriteError::Invalid(outcome.into_validation_error(validation)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Field, FieldOptions};
    use serde_json::json;

    fn user_meta() -> ModelMeta {
        ModelMeta::builder("User")
            .field(Field::integer("id", FieldOptions::new().primary_key()).unwrap())
            .field(Field::text("name", FieldOptions::new()).unwrap())
            .field(
                Field::related("company", FieldOptions::new().model("Company").required(false))
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn company_meta() -> ModelMeta {
        ModelMeta::builder("Company")
            .field(Field::integer("id", FieldOptions::new().primary_key()).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut manager = ModelManager::new();
        manager.register(user_meta()).unwrap();

        assert!(manager.is_registered("User"));
        assert_eq!(manager.get_model_meta("User").unwrap().name(), "User");
        assert_eq!(manager.model_names(), vec!["User"]);
    }

    #[test]
    fn test_register_twice_fails() {
        let mut manager = ModelManager::new();
        manager.register(user_meta()).unwrap();
        let err = manager.register(user_meta()).unwrap_err();
        assert_eq!(err, MetaError::AlreadyRegistered("User".into()));
    }

    #[test]
    fn test_unregistered_lookup() {
        let manager = ModelManager::new();
        let err = manager.get_model_meta("Ghost").unwrap_err();
        assert_eq!(err.code(), "MODEL_NOT_REGISTERED");
    }

    #[test]
    fn test_config_default_storage() {
        let config = ManagerConfig {
            default_storage: "mongo".into(),
            ..ManagerConfig::default()
        };
        let mut manager = ModelManager::with_config(config);
        let meta = manager.register(user_meta()).unwrap();
        assert_eq!(meta.storage(), "mongo");
    }

    #[test]
    fn test_record_from_json_links_related() {
        let mut manager = ModelManager::new();
        manager.register(user_meta()).unwrap();
        manager.register(company_meta()).unwrap();

        let record = manager
            .record_from_json("User", json!({"id": 1, "name": "Ann", "company": {"id": 3}}))
            .unwrap();
        let company = record.get("company").and_then(FieldValue::as_record).unwrap();
        assert_eq!(company.model(), "Company");
        assert_eq!(company.get_data("id"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_validate_for_write() {
        let mut manager = ModelManager::new();
        manager.register(user_meta()).unwrap();
        manager.register(company_meta()).unwrap();
        let operation = Operation::create();

        let record = Record::new("User").with("id", 1).with("name", "Ann");
        let outcome = manager
            .validate_for_write(&record, &operation, None)
            .await
            .unwrap();
        assert!(outcome.success());
        assert!(outcome.validation().unwrap().is_valid());

        let record = Record::new("User").with("id", 1);
        let err = manager
            .validate_for_write(&record, &operation, None)
            .await
            .unwrap_err();
        let WriteError::Invalid(failed) = err else {
            panic!("expected an invalid-record error");
        };
        assert!(failed.validation().unwrap().has_field_error("name", "required"));
    }

    #[tokio::test]
    async fn test_validate_for_write_unregistered() {
        let manager = ModelManager::new();
        let err = manager
            .validate_for_write(&Record::new("Ghost"), &Operation::create(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::Aborted(_)));
        assert_eq!(err.code(), "MODEL_NOT_REGISTERED");
    }
}
