//! Display extractor
//!
//! Turns a normalized [`Entry`] into a label and an optional subtitle.
//! Neither function fails; the worst case is the record serialized as JSON.

pub mod synonyms;

pub use synonyms::{
    Role, LABEL_PRIORITY, LOCATION_DETAIL_ROLES, LOCATION_PRIORITY, SELECTION_PRIORITY,
    SUBTITLE_ROLES,
};

use serde_json::{Map, Value};

use crate::model::Entry;
use crate::normalize::normalize;

/// Label for an entry.
///
/// Scalars are returned verbatim. Records resolve, in order: the first
/// `priority` field holding a non-empty string, the first non-empty string
/// property in the record's own key order, `"{vehicleType} ({n} faixas)"`
/// for price tables, and finally the record as compact JSON.
pub fn display_text(entry: &Entry, priority: &[&str]) -> String {
    match entry {
        Entry::Scalar(text) => text.clone(),
        Entry::Record(record) => record_text(record, priority),
    }
}

/// [`display_text`] with the selection-toggle override: a record with
/// `selected == true` and a `type` field is labelled by its `type`.
pub fn selection_text(entry: &Entry, priority: &[&str]) -> String {
    if let Entry::Record(record) = entry {
        if record.get("selected") == Some(&Value::Bool(true)) {
            if let Some(kind) = record.get("type").and_then(non_empty_str) {
                return kind.to_string();
            }
        }
    }
    display_text(entry, priority)
}

/// `"{Label}: {value}"` for the first role with a value, or `""`
pub fn subtitle(entry: &Entry, roles: &[Role]) -> String {
    let Some(record) = entry.as_record() else {
        return String::new();
    };
    roles
        .iter()
        .find_map(|role| role.text(record).map(|value| format!("{}: {}", role.label(), value)))
        .unwrap_or_default()
}

fn record_text(record: &Map<String, Value>, priority: &[&str]) -> String {
    if let Some(text) = priority
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(non_empty_str)
    {
        return text.to_string();
    }

    if let Some(text) = record.values().find_map(non_empty_str) {
        return text.to_string();
    }

    if let (Some(vehicle_type), Some(ranges)) = (record.get("vehicleType"), record.get("ranges")) {
        if ranges.is_array() {
            let label = match vehicle_type {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return format!("{} ({} faixas)", label, normalize(ranges).len());
        }
    }

    Value::Object(record.clone()).to_string()
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}
