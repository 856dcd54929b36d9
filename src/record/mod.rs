//! Model instances
//!
//! A `Record` is plain data tagged with the name of the model it claims to
//! be an instance of. It holds no metadata of its own; the registry supplies
//! that. Related-record fields hold nested records rather than raw JSON so
//! class checks can compare model names.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::fields::options::json_type_name;
use crate::registry::{MetaError, MetaResult};

/// A single property value on a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain JSON data (scalars, lists, objects)
    Data(Value),
    /// A linked record
    Record(Box<Record>),
    /// A list of linked records
    Records(Vec<Record>),
}

impl FieldValue {
    /// `null` counts as unset
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Data(Value::Null))
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            FieldValue::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            FieldValue::Records(records) => Some(records),
            _ => None,
        }
    }

    /// JSON rendering; linked records render as nested objects
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Data(value) => value.clone(),
            FieldValue::Record(record) => record.to_json(),
            FieldValue::Records(records) => {
                Value::Array(records.iter().map(Record::to_json).collect())
            }
        }
    }
}

/// An instance of a registered model
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: String,
    values: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record of the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            values: BTreeMap::new(),
        }
    }

    /// Creates a record from a JSON object of plain data
    pub fn from_json(model: impl Into<String>, data: Value) -> MetaResult<Self> {
        let model = model.into();
        let map = match data {
            Value::Object(map) => map,
            other => {
                return Err(MetaError::InvalidRecord {
                    model,
                    reason: format!("expected object, got {}", json_type_name(&other)),
                })
            }
        };

        let values = map
            .into_iter()
            .map(|(key, value)| (key, FieldValue::Data(value)))
            .collect();
        Ok(Self { model, values })
    }

    /// Name of the model this record belongs to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builder-style setter for plain data
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values
            .insert(name.into(), FieldValue::Data(value.into()));
    }

    pub fn set_record(&mut self, name: impl Into<String>, record: Record) {
        self.values
            .insert(name.into(), FieldValue::Record(Box::new(record)));
    }

    pub fn set_records(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.values.insert(name.into(), FieldValue::Records(records));
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Value of a property, `None` when absent or `null`
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).filter(|v| !v.is_unset())
    }

    /// Plain data of a property, `None` when absent, `null` or a linked record
    pub fn get_data(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(FieldValue::as_data)
    }

    /// True if the property exists, even when it is `null`
    pub fn has_property(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Own property names in sorted order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// JSON object of every property
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

/// JavaScript-style truthiness used for primary key checks
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
