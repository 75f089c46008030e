//! Vehicle price tables
//!
//! Two shapes coexist: nested `{vehicleType, ranges: [...]}` tables, and
//! flat rows `{vehicle_type, km_start, km_end, price}` as found in the
//! price-table store. Both render to the same [`PriceRow`].

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::extract::{display_text, Role, LABEL_PRIORITY};
use crate::model::{Entry, PriceTableRow};
use crate::normalize::{builtin_registry, decode, looks_encoded, normalize, FreightField};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub vehicle_type: String,
    pub km_start: Option<f64>,
    pub km_end: Option<f64>,
    pub price: Option<f64>,
}

impl PriceRow {
    fn from_range(vehicle_type: &str, range: &Entry) -> Self {
        let record = range.as_record();
        Self {
            vehicle_type: vehicle_type.to_string(),
            km_start: record.and_then(|r| Role::KmStart.number(r)),
            km_end: record.and_then(|r| Role::KmEnd.number(r)),
            price: record.and_then(|r| Role::Price.number(r)),
        }
    }
}

impl fmt::Display for PriceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - {} km",
            self.vehicle_type,
            format_km(self.km_start),
            format_km(self.km_end)
        )?;
        match self.price {
            Some(price) => write!(f, " | R$ {:.2}", price),
            None => write!(f, " | R$ ?"),
        }
    }
}

fn format_km(km: Option<f64>) -> String {
    match km {
        Some(km) if km.fract() == 0.0 => format!("{:.0}", km),
        Some(km) => format!("{:.1}", km),
        None => "?".to_string(),
    }
}

/// One row per range for nested tables, one row per entry for flat rows
pub fn render_price_tables(value: &Value) -> Vec<PriceRow> {
    let mut rows = Vec::new();
    for entry in builtin_registry().normalize_field(FreightField::PriceTables, value) {
        let record = match &entry {
            Entry::Record(record) => record,
            Entry::Scalar(_) => {
                rows.push(PriceRow::from_range(&display_text(&entry, LABEL_PRIORITY), &entry));
                continue;
            }
        };

        let vehicle_type =
            Role::VehicleType.text(record).unwrap_or_else(|| display_text(&entry, LABEL_PRIORITY));
        match nested_ranges(record) {
            Some(ranges) => rows.extend(
                ranges
                    .iter()
                    .map(|range| PriceRow::from_range(&vehicle_type, range)),
            ),
            None => rows.push(PriceRow::from_range(&vehicle_type, &entry)),
        }
    }
    rows
}

/// Render rows loaded from the price-table store
pub fn render_price_rows(rows: &[PriceTableRow]) -> Vec<PriceRow> {
    match serde_json::to_value(rows) {
        Ok(value) => render_price_tables(&value),
        Err(err) => {
            tracing::warn!(error = %err, "price rows could not be serialized for rendering");
            Vec::new()
        }
    }
}

/// Ranges of a nested table; `None` selects the flat branch
fn nested_ranges(record: &Map<String, Value>) -> Option<Vec<Entry>> {
    match record.get("ranges")? {
        ranges @ Value::Array(_) => Some(normalize(ranges)),
        Value::String(text) if looks_encoded(text) => {
            decode(text).filter(Value::is_array).map(|ranges| normalize(&ranges))
        }
        _ => None,
    }
}
