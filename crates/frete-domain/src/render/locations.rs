//! Destination and stop lines

use serde::Serialize;
use serde_json::Value;

use crate::extract::{display_text, Role, LOCATION_DETAIL_ROLES, LOCATION_PRIORITY};
use crate::model::Entry;
use crate::normalize::{builtin_registry, FreightField};

/// Heading of the legacy direct destination pair
pub const PRIMARY_DESTINATION: &str = "Primary Destination";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// CEP, neighborhood and address lines, when present
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl LocationLine {
    /// "City - ST"
    pub fn summary(&self) -> String {
        match &self.state {
            Some(state) => format!("{} - {}", self.city, state),
            None => self.city.clone(),
        }
    }

    fn from_entry(entry: &Entry) -> Self {
        let record = entry.as_record();
        Self {
            heading: None,
            city: display_text(entry, LOCATION_PRIORITY),
            state: record.and_then(|r| Role::State.text(r)),
            details: record
                .map(|r| {
                    LOCATION_DETAIL_ROLES
                        .iter()
                        .filter_map(|role| role.text(r).map(|v| format!("{}: {}", role.label(), v)))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Legacy direct pair first (when present), then every `destinos` entry.
///
/// Both sources are shown as stored; no deduplication between them.
pub fn render_destinations(
    direct_city: Option<&str>,
    direct_state: Option<&str>,
    destinations: &Value,
) -> Vec<LocationLine> {
    let mut lines = Vec::new();
    if let Some(primary) = direct_pair(direct_city, direct_state) {
        lines.push(primary);
    }
    lines.extend(render_field(FreightField::Destinations, destinations));
    lines
}

/// Every `paradas` entry; stops have no direct pair
pub fn render_stops(stops: &Value) -> Vec<LocationLine> {
    render_field(FreightField::Stops, stops)
}

fn render_field(field: FreightField, value: &Value) -> Vec<LocationLine> {
    builtin_registry()
        .normalize_field(field, value)
        .iter()
        .map(LocationLine::from_entry)
        .collect()
}

fn direct_pair(city: Option<&str>, state: Option<&str>) -> Option<LocationLine> {
    let city = city.map(str::trim).filter(|s| !s.is_empty());
    let state = state.map(str::trim).filter(|s| !s.is_empty());
    let label = city.or(state)?;
    Some(LocationLine {
        heading: Some(PRIMARY_DESTINATION.to_string()),
        city: label.to_string(),
        state: city.and(state).map(str::to_string),
        details: Vec::new(),
    })
}
