//! Model-level validation hooks
//!
//! A model may carry a synchronous hook, an asynchronous one, or both.
//! Presence is an explicit optional capability on the model's metadata.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::context::ValidationOptions;
use super::errors::ValidateResult;
use super::result::ModelValidationResult;
use crate::operation::Operation;
use crate::record::Record;
use crate::registry::ModelManager;

/// Read-only context handed to model hooks
#[derive(Clone, Copy)]
pub struct HookContext<'a> {
    pub manager: &'a ModelManager,
    pub operation: &'a Operation,
    pub options: &'a ValidationOptions,
}

/// Synchronous model hook
pub type ValidateHook =
    dyn Fn(&Record, &HookContext<'_>, &mut ModelValidationResult) -> ValidateResult<()> + Send + Sync;

/// Asynchronous model hook, e.g. a cross-record consistency check
#[async_trait]
pub trait AsyncModelHook: Send + Sync {
    async fn validate(
        &self,
        record: &Record,
        ctx: &HookContext<'_>,
        result: &mut ModelValidationResult,
    ) -> ValidateResult<()>;
}

/// Optional hooks attached to a model
#[derive(Clone, Default)]
pub struct ModelHooks {
    validate: Option<Arc<ValidateHook>>,
    validate_async: Option<Arc<dyn AsyncModelHook>>,
}

impl ModelHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Record, &HookContext<'_>, &mut ModelValidationResult) -> ValidateResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.validate = Some(Arc::new(hook));
        self
    }

    pub fn with_validate_async(mut self, hook: impl AsyncModelHook + 'static) -> Self {
        self.validate_async = Some(Arc::new(hook));
        self
    }

    pub fn has_validate(&self) -> bool {
        self.validate.is_some()
    }

    pub fn has_validate_async(&self) -> bool {
        self.validate_async.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_validate() && !self.has_validate_async()
    }

    /// Invoke the synchronous hook, then the asynchronous one.
    pub(crate) async fn run(
        &self,
        record: &Record,
        ctx: &HookContext<'_>,
        result: &mut ModelValidationResult,
    ) -> ValidateResult<()> {
        if let Some(hook) = &self.validate {
            hook(record, ctx, result)?;
        }
        if let Some(hook) = &self.validate_async {
            hook.validate(record, ctx, result).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for ModelHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHooks")
            .field("validate", &self.has_validate())
            .field("validate_async", &self.has_validate_async())
            .finish()
    }
}
