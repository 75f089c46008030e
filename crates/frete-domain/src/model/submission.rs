//! Multi-destination freight submission as sent by the company form

use serde::{Deserialize, Serialize};
use serde_json::Value;

use frete_types::{
    Error, FreightPayload, FreightStatus, FreightType, PriceRowDraft, TollPolicy,
};

/// Destination or stop as typed in the form.
///
/// Serializes to the stored shape (`cidade`, `estado`, ...) and accepts the
/// English names on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceInput {
    #[serde(rename = "cidade", alias = "city")]
    pub city: String,
    #[serde(rename = "estado", alias = "state", default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(rename = "bairro", alias = "neighborhood", default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(rename = "endereco", alias = "address", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PlaceInput {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            ..Default::default()
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Vehicle or body toggle from the picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_selected")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_selected() -> bool {
    true
}

/// One kilometre band of a vehicle price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(rename = "kmStart", alias = "km_start")]
    pub km_start: f64,
    #[serde(rename = "kmEnd", alias = "km_end")]
    pub km_end: f64,
    pub price: f64,
}

/// Price table of one vehicle type (nested shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePriceTable {
    #[serde(rename = "vehicleType", alias = "vehicle_type")]
    pub vehicle_type: String,
    #[serde(default)]
    pub ranges: Vec<PriceRange>,
}

/// Shared attributes plus the list of destinations to fan out over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreightSubmission {
    #[serde(default)]
    pub freight_type: FreightType,
    pub origin: PlaceInput,
    pub destinations: Vec<PlaceInput>,
    #[serde(default)]
    pub stops: Vec<PlaceInput>,
    #[serde(default)]
    pub merchandise_type: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub cargo_value: Option<f64>,
    #[serde(default)]
    pub vehicle_types: Vec<SelectionInput>,
    #[serde(default)]
    pub body_types: Vec<SelectionInput>,
    #[serde(default)]
    pub price_tables: Vec<VehiclePriceTable>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub scheduling_rules: Vec<String>,
    #[serde(default)]
    pub needs_helper: bool,
    #[serde(default)]
    pub needs_tracker: bool,
    #[serde(default)]
    pub needs_insurance: bool,
    #[serde(default)]
    pub toll: TollPolicy,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub collaborator_ids: Vec<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}

impl FreightSubmission {
    /// Reject submissions the writer cannot fan out
    pub fn validate(&self) -> Result<(), Error> {
        if self.destinations.is_empty() {
            return Err(Error::InvalidSubmission(
                "at least one destination is required".to_string(),
            ));
        }
        if let Some(index) = self
            .destinations
            .iter()
            .position(|d| d.city.trim().is_empty())
        {
            return Err(Error::InvalidSubmission(format!(
                "destination {} has no city",
                index + 1
            )));
        }
        Ok(())
    }

    /// Payload shared by every freight of this submission; `destinos` is left empty
    pub fn base_payload(&self) -> FreightPayload {
        FreightPayload {
            freight_type: self.freight_type,
            origin_city: self.origin.city.clone(),
            origin_state: self.origin.state.clone(),
            destination_city: None,
            destination_state: None,
            destinations: Value::Null,
            stops: if self.stops.is_empty() {
                Value::Null
            } else {
                Value::Array(self.stops.iter().map(PlaceInput::to_value).collect())
            },
            merchandise_type: self.merchandise_type.clone(),
            weight: self.weight,
            cargo_value: self.cargo_value,
            vehicle_types: serde_json::to_value(&self.vehicle_types).unwrap_or(Value::Null),
            body_types: serde_json::to_value(&self.body_types).unwrap_or(Value::Null),
            price_tables: Value::Null,
            benefits: serde_json::to_value(&self.benefits).unwrap_or(Value::Null),
            scheduling_rules: serde_json::to_value(&self.scheduling_rules)
                .unwrap_or(Value::Null),
            needs_helper: self.needs_helper,
            needs_tracker: self.needs_tracker,
            needs_insurance: self.needs_insurance,
            toll: self.toll.clone(),
            notes: self.notes.clone(),
            status: FreightStatus::Pendente,
            collaborator_ids: self.collaborator_ids.clone(),
            company_id: self.company_id.clone(),
        }
    }

    /// Payload of the freight written for one destination
    pub fn payload_for(&self, base: &FreightPayload, destination: &PlaceInput) -> FreightPayload {
        FreightPayload {
            destinations: Value::Array(vec![destination.to_value()]),
            ..base.clone()
        }
    }

    /// One price row per (vehicle type x range), tagged with the freight id
    pub fn price_rows_for(&self, freight_id: &str) -> Vec<PriceRowDraft> {
        self.price_tables
            .iter()
            .flat_map(|table| {
                table.ranges.iter().map(move |range| PriceRowDraft {
                    freight_id: freight_id.to_string(),
                    vehicle_type: table.vehicle_type.clone(),
                    km_start: range.km_start,
                    km_end: range.km_end,
                    price: range.price,
                })
            })
            .collect()
    }
}

/// Summary of one freight written by the fan-out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedFreight {
    pub id: String,
    pub code: String,
    pub destination: PlaceInput,
    pub price_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission() -> FreightSubmission {
        serde_json::from_value(json!({
            "origin": { "city": "Campinas", "state": "SP" },
            "destinations": [
                { "city": "Curitiba", "state": "PR", "neighborhood": "Centro" },
                { "cidade": "Joinville", "estado": "SC" }
            ],
            "vehicle_types": [
                { "type": "Truck", "selected": true, "category": "Pesado" },
                { "type": "Van", "selected": false }
            ],
            "price_tables": [
                { "vehicleType": "Truck", "ranges": [
                    { "kmStart": 0, "kmEnd": 100, "price": 300 },
                    { "km_start": 100, "km_end": 300, "price": 650 }
                ]},
                { "vehicle_type": "Carreta", "ranges": [
                    { "kmStart": 0, "kmEnd": 500, "price": 1200 }
                ]}
            ],
            "benefits": ["Seguro", "Descarga paga"]
        }))
        .unwrap()
    }

    #[test]
    fn test_accepts_both_naming_conventions() {
        let s = submission();
        assert_eq!(s.destinations[0].city, "Curitiba");
        assert_eq!(s.destinations[1].state, "SC");
        assert_eq!(s.price_tables[0].ranges[1].km_end, 300.0);
        assert_eq!(s.price_tables[1].vehicle_type, "Carreta");
    }

    #[test]
    fn test_payload_for_sets_single_destination() {
        let s = submission();
        let base = s.base_payload();
        let payload = s.payload_for(&base, &s.destinations[0]);
        assert_eq!(
            payload.destinations,
            json!([{ "cidade": "Curitiba", "estado": "PR", "bairro": "Centro" }])
        );
        assert_eq!(payload.origin_city, "Campinas");
        assert_eq!(payload.vehicle_types[1], json!({ "type": "Van", "selected": false }));
        assert!(payload.stops.is_null());
        assert!(payload.price_tables.is_null());
    }

    #[test]
    fn test_price_rows_cover_every_range() {
        let rows = submission().price_rows_for("f-1");
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.freight_id == "f-1"));
        assert_eq!(rows[2].vehicle_type, "Carreta");
        assert_eq!(rows[1].price, 650.0);
    }

    #[test]
    fn test_validate() {
        assert!(submission().validate().is_ok());

        let mut empty = submission();
        empty.destinations.clear();
        assert!(empty.validate().is_err());

        let mut blank = submission();
        blank.destinations[1].city = "  ".to_string();
        let err = blank.validate().unwrap_err();
        assert!(err.to_string().contains("destination 2"));
    }
}
