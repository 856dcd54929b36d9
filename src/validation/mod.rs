//! # Validation
//!
//! Validator library, the validation report, model hooks and the
//! orchestrator that runs them all against one record.

pub mod codes;
mod context;
mod errors;
mod hooks;
pub mod messages;
pub(crate) mod orchestrator;
mod result;
pub mod validators;

pub use context::{ValidationOptions, ValidatorContext, DEFAULT_TIMEOUT_MS};
pub use errors::{ValidateResult, ValidationError};
pub use hooks::{AsyncModelHook, HookContext, ModelHooks, ValidateHook};
pub use orchestrator::validate_record;
pub use result::{ErrorEntry, ModelValidationResult};
pub use validators::{AsyncValidator, Validator, ValidatorFn};
