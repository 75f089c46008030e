//! Vehicle and body selections

use serde::Serialize;
use serde_json::Value;

use crate::extract::{selection_text, subtitle, Role, SELECTION_PRIORITY};
use crate::model::Entry;
use crate::normalize::{builtin_registry, FreightField};

const DETAIL_ROLES: &[Role] = &[Role::Capacity, Role::Weight, Role::Size, Role::Model];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionLine {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Selected vehicle types
pub fn render_vehicle_types(value: &Value) -> Vec<SelectionLine> {
    render_selections(FreightField::VehicleTypes, value)
}

/// Selected body types
pub fn render_body_types(value: &Value) -> Vec<SelectionLine> {
    render_selections(FreightField::BodyTypes, value)
}

/// Entries carrying `selected` are kept only when it is `true`; entries
/// without the flag predate it and are always kept.
pub fn render_selections(field: FreightField, value: &Value) -> Vec<SelectionLine> {
    builtin_registry()
        .normalize_field(field, value)
        .iter()
        .filter(|entry| is_selected(entry))
        .map(|entry| {
            let record = entry.as_record();
            let detail = subtitle(entry, DETAIL_ROLES);
            SelectionLine {
                label: selection_text(entry, SELECTION_PRIORITY),
                category: record.and_then(|r| Role::Category.text(r)),
                detail: (!detail.is_empty()).then_some(detail),
            }
        })
        .collect()
}

fn is_selected(entry: &Entry) -> bool {
    match entry.get("selected") {
        Some(flag) => flag == &Value::Bool(true),
        None => true,
    }
}
