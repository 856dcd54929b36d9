//! Manager Configuration
//!
//! Where model definitions live, the storage name models fall back to, and
//! the validation options used when a call passes none.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::registry::{MetaError, MetaResult, DEFAULT_STORAGE};
use crate::validation::ValidationOptions;

/// Model manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfig {
    /// Directory of model definition files (default: "./models")
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Storage name for models that do not name one (default: "default")
    #[serde(default = "default_storage")]
    pub default_storage: String,

    /// Options for validation calls that pass none
    #[serde(default)]
    pub validation: ValidationOptions,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("./models")
}

fn default_storage() -> String {
    DEFAULT_STORAGE.to_string()
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            default_storage: default_storage(),
            validation: ValidationOptions::default(),
        }
    }
}

impl ManagerConfig {
    /// Read a JSON config file.
    ///
    /// A relative `modelsDir` is resolved against the file's directory.
    pub fn load(path: &Path) -> MetaResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| MetaError::load(path.display().to_string(), format!("Failed to read file: {}", e)))?;

        let mut config: ManagerConfig = serde_json::from_str(&content)
            .map_err(|e| MetaError::load(path.display().to_string(), format!("Invalid JSON: {}", e)))?;

        if config.models_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.models_dir = parent.join(&config.models_dir);
            }
        }
        Ok(config)
    }

    /// Create a config reading models from `dir`
    pub fn with_models_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: dir.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.models_dir, PathBuf::from("./models"));
        assert_eq!(config.default_storage, "default");
        assert_eq!(config.validation.timeout_ms, 5000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ManagerConfig =
            serde_json::from_str(r#"{"defaultStorage": "mongo", "validation": {"timeoutMs": 100}}"#)
                .unwrap();
        assert_eq!(config.default_storage, "mongo");
        assert_eq!(config.validation.timeout_ms, 100);
        assert_eq!(config.models_dir, PathBuf::from("./models"));
    }

    #[test]
    fn test_load_resolves_models_dir() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"modelsDir": "defs"}}"#).unwrap();

        let config = ManagerConfig::load(file.path()).unwrap();
        let parent = file.path().parent().unwrap();
        assert_eq!(config.models_dir, parent.join("defs"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ManagerConfig::load(Path::new("/nonexistent/modelmeta.json")).unwrap_err();
        assert_eq!(err.code(), "MODEL_LOAD_FAILED");
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = ManagerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
