//! # Operations
//!
//! Operation descriptors, the operation result wrapper with its validation
//! bridge error, and the query operator vocabulary.

mod descriptor;
mod errors;
mod query;
mod result;

pub use descriptor::{Operation, OperationKind};
pub use errors::{QueryError, QueryResult};
pub use query::{Filter, FilterExpr, OperatorKind, QueryOperator};
pub use result::{
    ModelOperationResult, ValidationFailed, VALIDATION_ERROR_CODE, VALIDATION_ERROR_MESSAGE,
};
