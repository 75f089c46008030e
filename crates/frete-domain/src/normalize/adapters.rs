//! Versioned shape adapters keyed by freight field
//!
//! Each adapter recognizes one legacy on-disk shape of a field and maps it
//! to the canonical entry list. The recursive flatten routine is the
//! fallback for everything no adapter claims.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use super::{decode_encoded, normalize};
use crate::extract::Role;
use crate::model::Entry;
use frete_types::Error;

/// List-valued freight columns the normalizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreightField {
    Destinations,
    Stops,
    VehicleTypes,
    BodyTypes,
    PriceTables,
    Benefits,
    SchedulingRules,
}

impl FreightField {
    pub const ALL: [FreightField; 7] = [
        FreightField::Destinations,
        FreightField::Stops,
        FreightField::VehicleTypes,
        FreightField::BodyTypes,
        FreightField::PriceTables,
        FreightField::Benefits,
        FreightField::SchedulingRules,
    ];

    /// Column name in the freight table
    pub fn column(&self) -> &'static str {
        match self {
            FreightField::Destinations => "destinos",
            FreightField::Stops => "paradas",
            FreightField::VehicleTypes => "tipos_veiculos",
            FreightField::BodyTypes => "tipos_carrocerias",
            FreightField::PriceTables => "tabelas_preco",
            FreightField::Benefits => "beneficios",
            FreightField::SchedulingRules => "regras_agendamento",
        }
    }
}

impl fmt::Display for FreightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for FreightField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.column() == s.trim())
            .ok_or_else(|| Error::InvalidValue(format!("unknown freight field: {}", s)))
    }
}

/// Maps one known legacy shape to canonical entries
pub trait ShapeAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Schema generation this adapter was written for
    fn version(&self) -> u32;

    /// `None` when `value` is not in this adapter's shape
    fn adapt(&self, value: &Value) -> Option<Vec<Entry>>;
}

/// Recursive flatten/decode; accepts every shape
pub struct FlattenAdapter;

impl ShapeAdapter for FlattenAdapter {
    fn name(&self) -> &'static str {
        "flatten"
    }

    fn version(&self) -> u32 {
        0
    }

    fn adapt(&self, value: &Value) -> Option<Vec<Entry>> {
        Some(normalize(value))
    }
}

/// Checkbox map written by the first vehicle/body pickers:
/// `{"Truck": true, "Van": false}`
pub struct SelectionMapAdapter;

impl ShapeAdapter for SelectionMapAdapter {
    fn name(&self) -> &'static str {
        "selection-map"
    }

    fn version(&self) -> u32 {
        1
    }

    fn adapt(&self, value: &Value) -> Option<Vec<Entry>> {
        let map = non_empty_object(value)?;
        if !map.values().all(Value::is_boolean) {
            return None;
        }
        Some(
            map.iter()
                .map(|(kind, selected)| {
                    let mut record = Map::new();
                    record.insert("type".to_string(), Value::String(kind.clone()));
                    record.insert("selected".to_string(), selected.clone());
                    Entry::Record(record)
                })
                .collect(),
        )
    }
}

/// Price tables keyed by vehicle type: `{"Truck": [{kmStart, kmEnd, price}]}`
pub struct VehicleKeyedPriceMapAdapter;

impl ShapeAdapter for VehicleKeyedPriceMapAdapter {
    fn name(&self) -> &'static str {
        "vehicle-keyed-price-map"
    }

    fn version(&self) -> u32 {
        1
    }

    fn adapt(&self, value: &Value) -> Option<Vec<Entry>> {
        let map = non_empty_object(value)?;
        if !map.values().all(Value::is_array) || map.keys().any(|key| is_price_table_field(key)) {
            return None;
        }
        Some(
            map.iter()
                .map(|(vehicle_type, ranges)| {
                    let mut record = Map::new();
                    record.insert("vehicleType".to_string(), Value::String(vehicle_type.clone()));
                    record.insert("ranges".to_string(), ranges.clone());
                    Entry::Record(record)
                })
                .collect(),
        )
    }
}

/// Keys of a single price table, never vehicle names
fn is_price_table_field(key: &str) -> bool {
    key == "ranges" || Role::VehicleType.synonyms().contains(&key)
}

fn non_empty_object(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object().filter(|map| !map.is_empty())
}

/// Entries plus the adapter that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub adapter: &'static str,
    pub version: u32,
    pub entries: Vec<Entry>,
}

/// Ordered adapters per field, with the flatten routine as fallback
pub struct AdapterRegistry {
    adapters: HashMap<FreightField, Vec<Box<dyn ShapeAdapter>>>,
    fallback: FlattenAdapter,
}

impl AdapterRegistry {
    /// Registry with no field adapters; everything goes through the fallback
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
            fallback: FlattenAdapter,
        }
    }

    /// Registry with the adapters for every known legacy shape
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(FreightField::VehicleTypes, Box::new(SelectionMapAdapter));
        registry.register(FreightField::BodyTypes, Box::new(SelectionMapAdapter));
        registry.register(FreightField::PriceTables, Box::new(VehicleKeyedPriceMapAdapter));
        registry
    }

    /// Append an adapter; earlier registrations win
    pub fn register(&mut self, field: FreightField, adapter: Box<dyn ShapeAdapter>) {
        self.adapters.entry(field).or_default().push(adapter);
    }

    /// `(name, version)` of the adapters registered for a field, in order
    pub fn adapters_for(&self, field: FreightField) -> Vec<(&'static str, u32)> {
        self.adapters
            .get(&field)
            .map(|list| list.iter().map(|a| (a.name(), a.version())).collect())
            .unwrap_or_default()
    }

    /// Normalize a field value and report which adapter handled it
    pub fn resolve(&self, field: FreightField, value: &Value) -> Normalized {
        let decoded = decode_encoded(value);
        let candidate = decoded.as_ref().unwrap_or(value);

        if let Some(list) = self.adapters.get(&field) {
            for adapter in list {
                if let Some(entries) = adapter.adapt(candidate) {
                    return Normalized {
                        adapter: adapter.name(),
                        version: adapter.version(),
                        entries,
                    };
                }
            }
        }

        Normalized {
            adapter: self.fallback.name(),
            version: self.fallback.version(),
            entries: normalize(value),
        }
    }

    pub fn normalize_field(&self, field: FreightField, value: &Value) -> Vec<Entry> {
        self.resolve(field, value).entries
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Process-wide registry with the built-in adapters
pub fn builtin_registry() -> &'static AdapterRegistry {
    static REGISTRY: OnceLock<AdapterRegistry> = OnceLock::new();
    REGISTRY.get_or_init(AdapterRegistry::with_builtin)
}
