//! # Query Operators
//!
//! The closed operator vocabulary filters are typed against. Filters are
//! parsed and shape-checked here; evaluating them is a backend concern.
//!
//! Filter JSON shape:
//!
//! ```json
//! {"status": "open", "age": {"$gte": 18, "$lt": 65}, "$or": [{"a": 1}, {"b": 2}]}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{QueryError, QueryResult};
use crate::fields::options::json_type_name;

/// Argument shape an operator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// A single scalar
    Value,
    /// A list of values
    ValueList,
    /// A list of nested filters
    Conjunction,
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
    In,
    Nin,
    Exists,
    And,
    Or,
}

impl QueryOperator {
    pub const ALL: [QueryOperator; 10] = [
        QueryOperator::Gt,
        QueryOperator::Gte,
        QueryOperator::Lt,
        QueryOperator::Lte,
        QueryOperator::Ne,
        QueryOperator::In,
        QueryOperator::Nin,
        QueryOperator::Exists,
        QueryOperator::And,
        QueryOperator::Or,
    ];

    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryOperator::Gt => "$gt",
            QueryOperator::Gte => "$gte",
            QueryOperator::Lt => "$lt",
            QueryOperator::Lte => "$lte",
            QueryOperator::Ne => "$ne",
            QueryOperator::In => "$in",
            QueryOperator::Nin => "$nin",
            QueryOperator::Exists => "$exists",
            QueryOperator::And => "$and",
            QueryOperator::Or => "$or",
        }
    }

    pub fn kind(&self) -> OperatorKind {
        match self {
            QueryOperator::Gt
            | QueryOperator::Gte
            | QueryOperator::Lt
            | QueryOperator::Lte
            | QueryOperator::Ne => OperatorKind::Value,
            QueryOperator::In | QueryOperator::Nin | QueryOperator::Exists => {
                OperatorKind::ValueList
            }
            QueryOperator::And | QueryOperator::Or => OperatorKind::Conjunction,
        }
    }

    /// Check a field operator's argument shape
    fn check_argument(&self, arg: &Value) -> QueryResult<()> {
        let ok = match self.kind() {
            OperatorKind::Value => !matches!(arg, Value::Array(_) | Value::Object(_)),
            OperatorKind::ValueList => arg.is_array(),
            OperatorKind::Conjunction => return Err(QueryError::MisplacedOperator(self.as_str())),
        };
        if ok {
            Ok(())
        } else {
            Err(QueryError::InvalidArgument {
                operator: self.as_str(),
                expected: self.expected(),
            })
        }
    }

    fn expected(&self) -> &'static str {
        match self.kind() {
            OperatorKind::Value => "a single value",
            OperatorKind::ValueList => "a list of values",
            OperatorKind::Conjunction => "a list of filter objects",
        }
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueryOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryOperator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

/// One term of a filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `{"field": value}`
    Equals { field: String, value: Value },
    /// `{"field": {"$op": value}}`
    Compare {
        field: String,
        operator: QueryOperator,
        value: Value,
    },
    /// `{"$and": [filter, ...]}`
    And(Vec<Filter>),
    /// `{"$or": [filter, ...]}`
    Or(Vec<Filter>),
}

/// A filter predicate: every term must hold.
///
/// Two filters are equal when they render to the same JSON object, so term
/// order does not matter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Filter {
    terms: Vec<FilterExpr>,
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and shape-check a filter object
    pub fn parse(value: &Value) -> QueryResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| QueryError::NotAnObject(json_type_name(value).to_string()))?;

        let mut terms = Vec::new();
        for (key, arg) in map {
            if key.starts_with('$') {
                terms.push(parse_conjunction(key, arg)?);
            } else {
                parse_field(key, arg, &mut terms)?;
            }
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[FilterExpr] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Add an equality term. An object value with `$` keys would read back
    /// as a comparison and is rejected.
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> QueryResult<Self> {
        let field = field.into();
        let value = value.into();
        if is_operator_object(&value) {
            return Err(QueryError::OperatorInValue(field));
        }
        self.terms.push(FilterExpr::Equals { field, value });
        Ok(self)
    }

    /// Add a field comparison, checking the argument shape
    pub fn compare(
        mut self,
        field: impl Into<String>,
        operator: QueryOperator,
        value: impl Into<Value>,
    ) -> QueryResult<Self> {
        let value = value.into();
        operator.check_argument(&value)?;
        self.terms.push(FilterExpr::Compare {
            field: field.into(),
            operator,
            value,
        });
        Ok(self)
    }

    pub fn and(mut self, filters: Vec<Filter>) -> Self {
        self.terms.push(FilterExpr::And(filters));
        self
    }

    pub fn or(mut self, filters: Vec<Filter>) -> Self {
        self.terms.push(FilterExpr::Or(filters));
        self
    }

    /// Render back to the JSON shape `parse` accepts.
    ///
    /// Terms that would collide in a single object (a second condition on
    /// the same field or operator, a second `$or`) are moved into the
    /// `$and` list, which keeps the predicate intact.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        let mut overflow = Vec::new();

        for term in &self.terms {
            match term {
                FilterExpr::Equals { field, value } => {
                    if map.contains_key(field) {
                        overflow.push(single(field, value.clone()));
                    } else {
                        map.insert(field.clone(), value.clone());
                    }
                }
                FilterExpr::Compare {
                    field,
                    operator,
                    value,
                } => {
                    let op = operator.as_str();
                    match map.get_mut(field) {
                        None => {
                            map.insert(field.clone(), single(op, value.clone()));
                        }
                        Some(Value::Object(ops))
                            if is_operator_map(&*ops) && !ops.contains_key(op) =>
                        {
                            ops.insert(op.to_string(), value.clone());
                        }
                        Some(_) => overflow.push(single(field, single(op, value.clone()))),
                    }
                }
                FilterExpr::And(filters) => {
                    overflow.extend(filters.iter().map(Filter::to_value));
                }
                FilterExpr::Or(filters) => {
                    let rendered = filters_to_value(filters);
                    if map.contains_key("$or") {
                        overflow.push(single("$or", rendered));
                    } else {
                        map.insert("$or".into(), rendered);
                    }
                }
            }
        }

        let has_and = self
            .terms
            .iter()
            .any(|term| matches!(term, FilterExpr::And(_)));
        if has_and || !overflow.is_empty() {
            map.insert("$and".into(), Value::Array(overflow));
        }
        Value::Object(map)
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn is_operator_map(map: &Map<String, Value>) -> bool {
    map.keys().any(|k| k.starts_with('$'))
}

fn is_operator_object(value: &Value) -> bool {
    value.as_object().map_or(false, is_operator_map)
}

fn filters_to_value(filters: &[Filter]) -> Value {
    Value::Array(filters.iter().map(Filter::to_value).collect())
}

fn parse_conjunction(key: &str, arg: &Value) -> QueryResult<FilterExpr> {
    let operator: QueryOperator = key.parse()?;
    if operator.kind() != OperatorKind::Conjunction {
        return Err(QueryError::MisplacedOperator(operator.as_str()));
    }

    let invalid = || QueryError::InvalidArgument {
        operator: operator.as_str(),
        expected: operator.expected(),
    };
    let items = arg.as_array().ok_or_else(invalid)?;
    let filters = items
        .iter()
        .map(|item| {
            if item.is_object() {
                Filter::parse(item)
            } else {
                Err(invalid())
            }
        })
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(match operator {
        QueryOperator::And => FilterExpr::And(filters),
        _ => FilterExpr::Or(filters),
    })
}

fn parse_field(field: &str, arg: &Value, terms: &mut Vec<FilterExpr>) -> QueryResult<()> {
    let ops = match arg {
        Value::Object(ops) if is_operator_map(ops) => ops,
        _ => {
            terms.push(FilterExpr::Equals {
                field: field.to_string(),
                value: arg.clone(),
            });
            return Ok(());
        }
    };

    for (key, value) in ops {
        let operator: QueryOperator = key.parse()?;
        operator.check_argument(value)?;
        terms.push(FilterExpr::Compare {
            field: field.to_string(),
            operator,
            value: value.clone(),
        });
    }
    Ok(())
}

impl TryFrom<Value> for Filter {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Filter::parse(&value)
    }
}

impl From<Filter> for Value {
    fn from(filter: Filter) -> Self {
        filter.to_value()
    }
}
