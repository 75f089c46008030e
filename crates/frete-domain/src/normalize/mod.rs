//! Shape normalizer
//!
//! Freight list fields were written by several client generations: absent,
//! bare scalars, plain lists, lists wrapped once or twice, and JSON strings
//! (sometimes encoded more than once) of any of those. [`normalize`] reduces
//! every one of them to a flat list of [`Entry`] values. It never fails:
//! a string that looks encoded but does not decode is kept verbatim.

pub mod adapters;

pub use adapters::{builtin_registry, AdapterRegistry, FreightField, Normalized, ShapeAdapter};

use serde_json::Value;

use crate::model::Entry;

/// Flatten any stored field value into entries
pub fn normalize(value: &Value) -> Vec<Entry> {
    let mut entries = Vec::new();
    flatten_into(value, &mut entries);
    entries
}

fn flatten_into(value: &Value, out: &mut Vec<Entry>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Value::String(text) if looks_encoded(text) => match decode(text) {
            Some(decoded) => flatten_into(&decoded, out),
            None => out.push(Entry::Scalar(text.clone())),
        },
        leaf => out.extend(Entry::from_leaf(leaf)),
    }
}

/// Whether a string starts like a serialized list or record
pub fn looks_encoded(text: &str) -> bool {
    text.starts_with('[') || text.starts_with('{')
}

/// Decode a serialized list or record; `None` on malformed input
pub fn decode(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Decode `value` when it is an encoded string
pub(crate) fn decode_encoded(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) if looks_encoded(text) => decode(text),
        _ => None,
    }
}
