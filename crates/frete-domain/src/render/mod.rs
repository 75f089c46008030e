//! Field renderers
//!
//! Each renderer normalizes its field through the adapter registry and
//! labels the entries with a field-specific synonym table.

pub mod locations;
pub mod price_tables;
pub mod selections;
pub mod view;

pub use locations::{render_destinations, render_stops, LocationLine, PRIMARY_DESTINATION};
pub use price_tables::{render_price_rows, render_price_tables, PriceRow};
pub use selections::{render_body_types, render_selections, render_vehicle_types, SelectionLine};
pub use view::{render_freight, FreightView};

use serde_json::Value;

use crate::extract::{display_text, LABEL_PRIORITY};
use crate::normalize::{builtin_registry, FreightField};

/// Plain labelled lines for benefits, scheduling rules and similar lists
pub fn render_badges(field: FreightField, value: &Value) -> Vec<String> {
    builtin_registry()
        .normalize_field(field, value)
        .iter()
        .map(|entry| display_text(entry, LABEL_PRIORITY))
        .filter(|label| !label.trim().is_empty())
        .collect()
}

pub fn render_scheduling_rules(value: &Value) -> Vec<String> {
    render_badges(FreightField::SchedulingRules, value)
}
