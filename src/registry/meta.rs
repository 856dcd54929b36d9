//! Model metadata and its builder
//!
//! `ModelMetaBuilder` accumulates fields into a local list and produces
//! immutable metadata exactly once. Nothing is shared between builds.

use std::collections::HashMap;

use tracing::debug;

use super::errors::{MetaError, MetaResult};
use crate::fields::Field;
use crate::record::Record;
use crate::validation::ModelHooks;

/// Storage name used when a model names none
pub const DEFAULT_STORAGE: &str = "default";

/// Finalized metadata for one model
#[derive(Debug, Clone)]
pub struct ModelMeta {
    name: String,
    label: String,
    storage: Option<String>,
    singleton: bool,
    primary_key: Option<String>,
    fields: Vec<Field>,
    fields_by_name: HashMap<String, usize>,
    hooks: ModelHooks,
}

impl ModelMeta {
    /// Start building metadata for the model declared as `name`
    pub fn builder(name: impl Into<String>) -> ModelMetaBuilder {
        ModelMetaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label, the model name unless one was given
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Backend storage name
    pub fn storage(&self) -> &str {
        self.storage.as_deref().unwrap_or(DEFAULT_STORAGE)
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Name of the primary key field, if the model has one
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields_by_name.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    pub fn hooks(&self) -> &ModelHooks {
        &self.hooks
    }

    /// A new record of this model with every field default applied
    pub fn new_record(&self) -> Record {
        let mut record = Record::new(self.name.clone());
        for field in &self.fields {
            if let Some(default) = field.default_value() {
                record.set(field.name(), default.clone());
            }
        }
        record
    }

    /// Fill in the storage name when the model declared none
    pub(crate) fn with_default_storage(mut self, storage: &str) -> Self {
        if self.storage.is_none() {
            self.storage = Some(storage.to_string());
        }
        self
    }
}

/// Builder for [`ModelMeta`]
///
/// `declared_fields` stands in for fields attached to a model type by
/// declaration sugar. They are appended after any explicit `fields`.
#[derive(Debug, Default)]
pub struct ModelMetaBuilder {
    declared_name: String,
    name: Option<String>,
    label: Option<String>,
    storage: Option<String>,
    singleton: bool,
    primary_key: Option<String>,
    fields: Vec<Field>,
    declared: Vec<Field>,
    hooks: ModelHooks,
}

impl ModelMetaBuilder {
    pub fn new(declared_name: impl Into<String>) -> Self {
        Self {
            declared_name: declared_name.into(),
            ..Self::default()
        }
    }

    /// Explicit model name. Must match the declared name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    pub fn singleton(mut self, singleton: bool) -> Self {
        self.singleton = singleton;
        self
    }

    /// Name the primary key field explicitly
    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = Some(field.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Fields attached by declaration, consumed by `build`
    pub fn declared_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.declared.extend(fields);
        self
    }

    pub fn hooks(mut self, hooks: ModelHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Check every invariant and produce the metadata.
    pub fn build(self) -> MetaResult<ModelMeta> {
        let name = match self.name {
            Some(supplied) if supplied != self.declared_name => {
                return Err(MetaError::NameConflict {
                    declared: self.declared_name,
                    supplied,
                })
            }
            _ => self.declared_name,
        };

        let mut fields = self.fields;
        fields.extend(self.declared);
        if fields.is_empty() {
            return Err(MetaError::NoFields(name));
        }

        let mut fields_by_name = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            if fields_by_name.insert(field.name().to_string(), idx).is_some() {
                return Err(MetaError::DuplicateField {
                    model: name,
                    field: field.name().to_string(),
                });
            }
        }

        let primary_key = resolve_primary_key(&name, self.primary_key, &fields, &fields_by_name)?;

        debug!(model = %name, fields = fields.len(), "built model metadata");

        Ok(ModelMeta {
            label: self.label.unwrap_or_else(|| name.clone()),
            name,
            storage: self.storage,
            singleton: self.singleton,
            primary_key,
            fields,
            fields_by_name,
            hooks: self.hooks,
        })
    }
}

/// At most one primary key: either named explicitly or flagged on a field.
fn resolve_primary_key(
    model: &str,
    explicit: Option<String>,
    fields: &[Field],
    fields_by_name: &HashMap<String, usize>,
) -> MetaResult<Option<String>> {
    let mut primary_key = explicit;
    if let Some(pk) = &primary_key {
        if !fields_by_name.contains_key(pk) {
            return Err(MetaError::UnknownPrimaryKey {
                model: model.to_string(),
                field: pk.clone(),
            });
        }
    }

    for field in fields.iter().filter(|f| f.is_primary_key()) {
        match &primary_key {
            Some(existing) if existing != field.name() => {
                return Err(MetaError::MultiplePrimaryKeys {
                    model: model.to_string(),
                    first: existing.clone(),
                    second: field.name().to_string(),
                })
            }
            Some(_) => {}
            None => primary_key = Some(field.name().to_string()),
        }
    }
    Ok(primary_key)
}
