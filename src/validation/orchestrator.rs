//! Validation orchestrator
//!
//! One run walks: extra-field scan, synchronous field validators, all
//! asynchronous field validators together, then the model hooks. The whole
//! run races a single deadline.
//!
//! Asynchronous validators each write into their own scratch result. The
//! scratch results are merged in declaration order once every validator has
//! settled, so a run cut short by its deadline leaves nothing behind.

use std::future::Future;
use std::time::Duration;

use futures_util::future::try_join_all;
use serde_json::json;
use tracing::{debug, warn};

use super::codes;
use super::context::{ValidationOptions, ValidatorContext};
use super::errors::{ValidateResult, ValidationError};
use super::hooks::HookContext;
use super::messages;
use super::result::ModelValidationResult;
use crate::operation::Operation;
use crate::record::Record;
use crate::registry::{ModelManager, ModelMeta};

/// Validate a record against its registered model.
///
/// Resolves with the full report, `valid == false` when the data breaks any
/// rule. Fails only when validation itself cannot complete: the model is
/// not registered, a hook or asynchronous validator fails, or the deadline
/// passes.
pub async fn validate_record(
    manager: &ModelManager,
    record: &Record,
    operation: &Operation,
    options: Option<&ValidationOptions>,
) -> ValidateResult<ModelValidationResult> {
    let meta = manager.get_model_meta(record.model())?;
    let options = options.unwrap_or_else(|| manager.default_options());

    debug!(
        model = meta.name(),
        operation = operation.name(),
        timeout_ms = options.timeout_ms,
        "validating record"
    );

    let work = run(manager, &meta, record, operation, options);
    let result = with_deadline(options.timeout(), work).await?;

    debug!(
        model = meta.name(),
        valid = result.is_valid(),
        field_errors = result.field_errors().len(),
        model_errors = result.model_errors().len(),
        "validation finished"
    );
    Ok(result)
}

async fn run(
    manager: &ModelManager,
    meta: &ModelMeta,
    record: &Record,
    operation: &Operation,
    options: &ValidationOptions,
) -> ValidateResult<ModelValidationResult> {
    let mut result = ModelValidationResult::new();

    if options.fields.is_none() {
        scan_extra_fields(meta, record, &mut result)?;
    }

    let contexts: Vec<ValidatorContext<'_>> = meta
        .fields()
        .iter()
        .filter(|field| options.includes(field.name()))
        .map(|field| ValidatorContext {
            manager,
            record,
            field,
            operation,
            options,
        })
        .collect();

    for ctx in &contexts {
        ctx.field.run_sync_validators(ctx, &mut result)?;
    }
    result.merge(run_async_validators(&contexts).await?);

    let hook_ctx = HookContext {
        manager,
        operation,
        options,
    };
    meta.hooks().run(record, &hook_ctx, &mut result).await?;

    Ok(result)
}

/// Every property the model does not declare is a model error
fn scan_extra_fields(
    meta: &ModelMeta,
    record: &Record,
    result: &mut ModelValidationResult,
) -> ValidateResult<()> {
    for name in record.property_names() {
        if meta.field(name).is_none() {
            result.add_model_error(
                messages::extra_field(name, meta.name()),
                Some(codes::EXTRA_FIELD),
                Some(json!({ "field": name })),
            )?;
        }
    }
    Ok(())
}

/// Run every asynchronous validator of the given fields concurrently.
///
/// The first failure wins and the remaining validators are dropped.
pub(crate) async fn run_async_validators(
    contexts: &[ValidatorContext<'_>],
) -> ValidateResult<ModelValidationResult> {
    let jobs = contexts.iter().flat_map(|ctx| {
        ctx.field.async_validators().iter().map(move |validator| async move {
            let mut scratch = ModelValidationResult::new();
            validator.validate(ctx, &mut scratch).await?;
            Ok::<_, ValidationError>(scratch)
        })
    });

    let mut merged = ModelValidationResult::new();
    for scratch in try_join_all(jobs).await? {
        merged.merge(scratch);
    }
    Ok(merged)
}

/// Bound `work` by `limit`. The timer is dropped as soon as `work` settles.
pub(crate) async fn with_deadline<T, F>(limit: Duration, work: F) -> ValidateResult<T>
where
    F: Future<Output = ValidateResult<T>>,
{
    let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
    match tokio::time::timeout(limit, work).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(timeout_ms, "validation timed out");
            Err(ValidationError::Timeout(timeout_ms))
        }
    }
}
