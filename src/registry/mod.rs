//! # Registry
//!
//! Model metadata, the manager that holds registered models, and the
//! loader for model definitions on disk.

mod errors;
mod loader;
mod manager;
mod meta;

pub use errors::{MetaError, MetaResult, WriteError};
pub use loader::{ModelDef, ModelLoader};
pub use manager::ModelManager;
pub use meta::{ModelMeta, ModelMetaBuilder, DEFAULT_STORAGE};
