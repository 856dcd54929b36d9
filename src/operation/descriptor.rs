//! Operation descriptor
//!
//! Names the operation a validation runs under. Validators and hooks may
//! read it, e.g. to relax checks on update.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::query::Filter;

/// Kinds of model operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Remove,
    Exec,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Read => "read",
            OperationKind::Update => "update",
            OperationKind::Remove => "remove",
            OperationKind::Exec => "exec",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operation on a model, with an optional filter predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operation")]
    pub kind: OperationKind,

    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl Operation {
    pub fn new(kind: OperationKind) -> Self {
        Self { kind, filter: None }
    }

    pub fn create() -> Self {
        Self::new(OperationKind::Create)
    }

    pub fn read() -> Self {
        Self::new(OperationKind::Read)
    }

    pub fn update() -> Self {
        Self::new(OperationKind::Update)
    }

    pub fn remove() -> Self {
        Self::new(OperationKind::Remove)
    }

    pub fn exec() -> Self {
        Self::new(OperationKind::Exec)
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Get operation name for logging
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Create and update write record data
    pub fn is_write(&self) -> bool {
        matches!(self.kind, OperationKind::Create | OperationKind::Update)
    }
}
