//! Normalized list entry

use serde::Serialize;
use serde_json::{Map, Value};

/// One element of a flattened list field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Scalar(String),
    Record(Map<String, Value>),
}

impl Entry {
    /// Classify a non-list JSON leaf. Nulls and arrays are not leaves.
    pub fn from_leaf(value: &Value) -> Option<Entry> {
        match value {
            Value::Null | Value::Array(_) => None,
            Value::String(s) => Some(Entry::Scalar(s.clone())),
            Value::Bool(b) => Some(Entry::Scalar(b.to_string())),
            Value::Number(n) => Some(Entry::Scalar(n.to_string())),
            Value::Object(map) => Some(Entry::Record(map.clone())),
        }
    }

    pub fn scalar(text: impl Into<String>) -> Self {
        Entry::Scalar(text.into())
    }

    pub fn as_record(&self) -> Option<&Map<String, Value>> {
        match self {
            Entry::Record(map) => Some(map),
            Entry::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Entry::Scalar(s) => Some(s),
            Entry::Record(_) => None,
        }
    }

    /// Field lookup; always `None` for scalars
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record().and_then(|map| map.get(key))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Entry::Scalar(s) => Value::String(s.clone()),
            Entry::Record(map) => Value::Object(map.clone()),
        }
    }
}
