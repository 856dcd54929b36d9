//! Built-in field validators
//!
//! Every validator inspects one field's value on one record and appends at
//! most the errors of its own concern. All of them skip an unset value,
//! except `required`, so many validators compose on one field without
//! repeating "missing value" complaints.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{json, Value};

use super::codes;
use super::context::ValidatorContext;
use super::errors::{ValidateResult, ValidationError};
use super::messages;
use super::result::ModelValidationResult;
use crate::record::{is_truthy, FieldValue};

/// Signature of a synchronous field validator
pub type ValidatorFn = fn(&ValidatorContext<'_>, &mut ModelValidationResult) -> ValidateResult<()>;

/// A named synchronous validator
#[derive(Clone, Copy)]
pub struct Validator {
    name: &'static str,
    check: ValidatorFn,
}

impl Validator {
    pub const fn new(name: &'static str, check: ValidatorFn) -> Self {
        Self { name, check }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn run(
        &self,
        ctx: &ValidatorContext<'_>,
        result: &mut ModelValidationResult,
    ) -> ValidateResult<()> {
        (self.check)(ctx, result)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

/// An asynchronous field validator, e.g. a uniqueness check against a backend.
///
/// Returning an error aborts the whole validation run; recording a field
/// error does not.
#[async_trait]
pub trait AsyncValidator: Send + Sync {
    fn name(&self) -> &str;

    async fn validate(
        &self,
        ctx: &ValidatorContext<'_>,
        result: &mut ModelValidationResult,
    ) -> ValidateResult<()>;
}

pub const REQUIRED: Validator = Validator::new("required", required);
pub const NUMBER: Validator = Validator::new("number", number);
pub const INTEGER: Validator = Validator::new("integer", integer);
pub const MIN_VALUE: Validator = Validator::new("min_value", min_value);
pub const MAX_VALUE: Validator = Validator::new("max_value", max_value);
pub const STRING: Validator = Validator::new("string", string);
pub const STRING_EMPTY: Validator = Validator::new("string_empty", string_empty);
pub const MIN_STRING_LENGTH: Validator = Validator::new("min_string_length", min_string_length);
pub const MAX_STRING_LENGTH: Validator = Validator::new("max_string_length", max_string_length);
pub const REGEX: Validator = Validator::new("regex", regex);
pub const BOOLEAN: Validator = Validator::new("boolean", boolean);
pub const SINGLE_SELECTION: Validator = Validator::new("single_selection", single_selection);
pub const MULTIPLE_SELECTION: Validator = Validator::new("multiple_selection", multiple_selection);
pub const LIST_EMPTY: Validator = Validator::new("list_empty", list_empty);
pub const DATE: Validator = Validator::new("date", date);
pub const TIME: Validator = Validator::new("time", time);
pub const DATETIME: Validator = Validator::new("datetime", datetime);
pub const MODEL_CLASS: Validator = Validator::new("model_class", model_class);
pub const MODEL_PRIMARY_KEY: Validator = Validator::new("model_primary_key", model_primary_key);
pub const MODEL_LIST_CLASS: Validator = Validator::new("model_list_class", model_list_class);

fn fail(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
    message: String,
    code: &str,
    data: Option<Value>,
) -> ValidateResult<()> {
    result.add_field_error(ctx.field_name(), message, Some(code), data)
}

/// Value must be set (not absent, not null)
pub fn required(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    if ctx.value().is_none() {
        return fail(ctx, result, messages::required(ctx.field.label()), codes::REQUIRED, None);
    }
    Ok(())
}

/// Numeric value of plain data: numbers, or strings that parse as one
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

pub fn number(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    if value.as_data().and_then(numeric).is_none() {
        return fail(ctx, result, messages::not_a_number(ctx.field.label()), codes::NOT_A_NUMBER, None);
    }
    Ok(())
}

/// Fires only for numeric values with a fractional part; non-numeric values
/// are left to `number`.
pub fn integer(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let Some(value) = ctx.data() else {
        return Ok(());
    };
    if numeric(value).map_or(false, |n| n.fract() != 0.0) {
        return fail(ctx, result, messages::not_an_integer(ctx.field.label()), codes::NOT_AN_INTEGER, None);
    }
    Ok(())
}

pub fn min_value(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let (Some(min), Some(n)) = (ctx.field.options().min_value, ctx.data().and_then(numeric)) else {
        return Ok(());
    };
    if n < min {
        return fail(
            ctx,
            result,
            messages::min_value(ctx.field.label(), min),
            codes::MIN_VALUE,
            Some(json!({ "minValue": min })),
        );
    }
    Ok(())
}

pub fn max_value(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let (Some(max), Some(n)) = (ctx.field.options().max_value, ctx.data().and_then(numeric)) else {
        return Ok(());
    };
    if n > max {
        return fail(
            ctx,
            result,
            messages::max_value(ctx.field.label(), max),
            codes::MAX_VALUE,
            Some(json!({ "maxValue": max })),
        );
    }
    Ok(())
}

pub fn string(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    if !matches!(value.as_data(), Some(Value::String(_))) {
        return fail(ctx, result, messages::not_a_string(ctx.field.label()), codes::NOT_A_STRING, None);
    }
    Ok(())
}

/// Whitespace-only strings count as empty
pub fn string_empty(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    if let Some(Value::String(s)) = ctx.data() {
        if s.trim().is_empty() {
            return fail(ctx, result, messages::string_empty(ctx.field.label()), codes::STRING_EMPTY, None);
        }
    }
    Ok(())
}

pub fn min_string_length(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
) -> ValidateResult<()> {
    let (Some(min), Some(Value::String(s))) = (ctx.field.options().min_length, ctx.data()) else {
        return Ok(());
    };
    if s.chars().count() < min {
        return fail(
            ctx,
            result,
            messages::min_string_length(ctx.field.label(), min),
            codes::MIN_STRING_LENGTH,
            Some(json!({ "minLength": min })),
        );
    }
    Ok(())
}

pub fn max_string_length(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
) -> ValidateResult<()> {
    let (Some(max), Some(Value::String(s))) = (ctx.field.options().max_length, ctx.data()) else {
        return Ok(());
    };
    if s.chars().count() > max {
        return fail(
            ctx,
            result,
            messages::max_string_length(ctx.field.label(), max),
            codes::MAX_STRING_LENGTH,
            Some(json!({ "maxLength": max })),
        );
    }
    Ok(())
}

pub fn regex(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let (Some(pattern), Some(Value::String(s))) = (ctx.field.pattern(), ctx.data()) else {
        return Ok(());
    };
    if !pattern.is_match(s) {
        return fail(ctx, result, messages::no_regex_match(ctx.field.label()), codes::NO_REGEX_MATCH, None);
    }
    Ok(())
}

pub fn boolean(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    if !matches!(value.as_data(), Some(Value::Bool(_))) {
        return fail(ctx, result, messages::not_a_boolean(ctx.field.label()), codes::NOT_A_BOOLEAN, None);
    }
    Ok(())
}

pub fn single_selection(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    let matched = match value.as_data() {
        Some(Value::String(s)) => ctx.field.selection_label(s).is_some(),
        _ => false,
    };
    if !matched {
        return fail(
            ctx,
            result,
            messages::no_selection_match(ctx.field.label()),
            codes::NO_SELECTION_MATCH,
            None,
        );
    }
    Ok(())
}

pub fn multiple_selection(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    let Some(Value::Array(items)) = value.as_data() else {
        return fail(
            ctx,
            result,
            messages::selection_not_a_list(ctx.field.label()),
            codes::SELECTION_NOT_A_LIST,
            None,
        );
    };

    let all_match = items.iter().all(|item| {
        item.as_str()
            .map_or(false, |s| ctx.field.selection_label(s).is_some())
    });
    if !all_match {
        return fail(
            ctx,
            result,
            messages::no_selection_match(ctx.field.label()),
            codes::NO_SELECTION_MATCH,
            None,
        );
    }
    Ok(())
}

pub fn list_empty(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let empty = match ctx.value() {
        Some(FieldValue::Data(Value::Array(items))) => items.is_empty(),
        Some(FieldValue::Records(records)) => records.is_empty(),
        _ => false,
    };
    if empty {
        return fail(ctx, result, messages::list_empty(ctx.field.label()), codes::LIST_EMPTY, None);
    }
    Ok(())
}

fn parses_as_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn parses_as_time(s: &str) -> bool {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
}

fn parses_as_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}

fn temporal(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
    parses: fn(&str) -> bool,
    message: fn(&str) -> String,
    code: &str,
) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    let ok = match value.as_data() {
        Some(Value::String(s)) => parses(s),
        _ => false,
    };
    if !ok {
        return fail(ctx, result, message(ctx.field.label()), code, None);
    }
    Ok(())
}

pub fn date(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    temporal(ctx, result, parses_as_date, messages::not_a_date, codes::NOT_A_DATE)
}

pub fn time(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    temporal(ctx, result, parses_as_time, messages::not_a_time, codes::NOT_A_TIME)
}

pub fn datetime(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    temporal(ctx, result, parses_as_datetime, messages::not_a_datetime, codes::NOT_A_DATETIME)
}

/// Linked value must be a record of the field's model.
///
/// The linked model must be registered; an unregistered model aborts the run.
pub fn model_class(ctx: &ValidatorContext<'_>, result: &mut ModelValidationResult) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    let model = ctx.field.related_model().unwrap_or_default();
    ctx.manager.get_model_meta(model)?;

    let matches = value.as_record().map_or(false, |r| r.model() == model);
    if !matches {
        return fail(
            ctx,
            result,
            messages::invalid_model_class(ctx.field.label(), model),
            codes::INVALID_MODEL_CLASS,
            Some(json!({ "model": model })),
        );
    }
    Ok(())
}

/// Linked record must carry a truthy primary key value.
pub fn model_primary_key(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
) -> ValidateResult<()> {
    let Some(linked) = ctx.value().and_then(FieldValue::as_record) else {
        return Ok(());
    };
    if Some(linked.model()) != ctx.field.related_model() {
        return Ok(());
    }

    let meta = ctx.manager.get_model_meta(linked.model())?;
    let primary_key = meta
        .primary_key()
        .ok_or_else(|| ValidationError::NoPrimaryKey(linked.model().to_string()))?;

    if !linked.get_data(primary_key).map_or(false, is_truthy) {
        return fail(
            ctx,
            result,
            messages::missing_model_primary_key(ctx.field.label()),
            codes::MISSING_MODEL_PRIMARY_KEY,
            None,
        );
    }
    Ok(())
}

/// Value must be a list of records of the field's model.
pub fn model_list_class(
    ctx: &ValidatorContext<'_>,
    result: &mut ModelValidationResult,
) -> ValidateResult<()> {
    let Some(value) = ctx.value() else {
        return Ok(());
    };
    let model = ctx.field.related_model().unwrap_or_default();
    ctx.manager.get_model_meta(model)?;

    match value {
        FieldValue::Records(records) => {
            if records.iter().any(|r| r.model() != model) {
                return fail(
                    ctx,
                    result,
                    messages::invalid_model_list_class(ctx.field.label(), model),
                    codes::INVALID_MODEL_LIST_CLASS,
                    Some(json!({ "model": model })),
                );
            }
        }
        FieldValue::Data(Value::Array(items)) if items.is_empty() => {}
        _ => {
            return fail(
                ctx,
                result,
                messages::invalid_model_list_data(ctx.field.label()),
                codes::INVALID_MODEL_LIST_DATA,
                None,
            );
        }
    }
    Ok(())
}
