//! Model definition loader
//!
//! Reads one `*.json` file per model from a directory:
//!
//! ```json
//! {
//!   "name": "User",
//!   "label": "Users",
//!   "storage": "default",
//!   "singleton": false,
//!   "primaryKey": "id",
//!   "fields": [
//!     {"type": "auto_number", "name": "id", "options": {"primaryKey": true}},
//!     {"type": "text", "name": "name", "options": {"maxLength": 80}}
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::errors::{MetaError, MetaResult};
use super::manager::ModelManager;
use super::meta::ModelMeta;
use crate::fields::FieldDef;

/// Serialized model definition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDef {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub singleton: bool,
    #[serde(default)]
    pub primary_key: Option<String>,
    /// Checked to be an array when the model is built
    #[serde(default)]
    pub fields: Value,
}

impl ModelDef {
    /// Build metadata from this definition
    pub fn build(self) -> MetaResult<ModelMeta> {
        let entries = match self.fields {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            _ => return Err(MetaError::InvalidFieldList(self.name)),
        };

        let fields = entries
            .into_iter()
            .map(|entry| FieldDef::from_value(entry)?.build())
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = ModelMeta::builder(&self.name)
            .singleton(self.singleton)
            .fields(fields);
        if let Some(label) = self.label {
            builder = builder.label(label);
        }
        if let Some(storage) = self.storage {
            builder = builder.storage(storage);
        }
        if let Some(pk) = self.primary_key {
            builder = builder.primary_key(pk);
        }
        builder.build()
    }
}

/// Loads model definitions from a directory
pub struct ModelLoader {
    models_dir: PathBuf,
}

impl ModelLoader {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Definition files in file-name order
    pub fn definition_files(&self) -> MetaResult<Vec<PathBuf>> {
        let dir = self.models_dir.display().to_string();
        let entries = fs::read_dir(&self.models_dir)
            .map_err(|e| MetaError::load(&dir, format!("Failed to read directory: {}", e)))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| MetaError::load(&dir, format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// Parse and build one definition file
    pub fn load_file(&self, path: &Path) -> MetaResult<ModelMeta> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| MetaError::load(&path_str, format!("Failed to read file: {}", e)))?;

        let def: ModelDef = serde_json::from_str(&content)
            .map_err(|e| MetaError::load(&path_str, format!("Invalid JSON: {}", e)))?;

        debug!(path = %path_str, model = %def.name, "loading model definition");
        def.build()
    }

    /// Register every definition in the directory, in file-name order.
    ///
    /// Stops at the first file that fails; earlier models stay registered.
    pub fn load_all(&self, manager: &mut ModelManager) -> MetaResult<Vec<String>> {
        let mut loaded = Vec::new();
        for path in self.definition_files()? {
            let meta = self.load_file(&path)?;
            let meta = manager.register(meta)?;
            loaded.push(meta.name().to_string());
        }
        Ok(loaded)
    }
}
