//! # Query Errors

use thiserror::Error;

/// Result type for filter parsing
pub type QueryResult<T> = Result<T, QueryError>;

/// Malformed filter expressions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown query operator: {0}")]
    UnknownOperator(String),

    #[error("Operator {operator} expects {expected}")]
    InvalidArgument {
        operator: &'static str,
        expected: &'static str,
    },

    #[error("Operator {0} is not allowed here")]
    MisplacedOperator(&'static str),

    #[error("Filter must be an object, got {0}")]
    NotAnObject(String),

    #[error("Equality value for field '{0}' must not contain operator keys")]
    OperatorInValue(String),
}

impl QueryError {
    /// Stable machine code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownOperator(_) => "QUERY_UNKNOWN_OPERATOR",
            Self::InvalidArgument { .. } => "QUERY_INVALID_ARGUMENT",
            Self::MisplacedOperator(_) => "QUERY_MISPLACED_OPERATOR",
            Self::NotAnObject(_) => "QUERY_NOT_AN_OBJECT",
            Self::OperatorInValue(_) => "QUERY_OPERATOR_IN_VALUE",
        }
    }
}
