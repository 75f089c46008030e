//! Persisted record types
//!
//! List-valued freight fields are kept as raw JSON: their on-disk shape has
//! drifted across schema versions and is only interpreted through the
//! domain normalizer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Missing keys and explicit nulls both read as the default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of freight offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreightType {
    #[serde(rename = "agregamento", alias = "aggregation")]
    Aggregation,
    #[serde(rename = "frete_completo", alias = "full_load", alias = "completo")]
    FullLoad,
    #[serde(rename = "retorno", alias = "return_load")]
    ReturnLoad,
    #[default]
    #[serde(rename = "generico", alias = "generic")]
    Generic,
}

impl FreightType {
    pub fn label(&self) -> &'static str {
        match self {
            FreightType::Aggregation => "Agregamento",
            FreightType::FullLoad => "Frete completo",
            FreightType::ReturnLoad => "Frete de retorno",
            FreightType::Generic => "Frete",
        }
    }
}

/// Freight lifecycle status
///
/// `Pendente -> Ativo -> Aceito -> EmAndamento -> Concluido`, with
/// `Cancelado` reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreightStatus {
    #[default]
    Pendente,
    Ativo,
    Aceito,
    EmAndamento,
    Concluido,
    Cancelado,
}

impl FreightStatus {
    pub const ALL: [FreightStatus; 6] = [
        FreightStatus::Pendente,
        FreightStatus::Ativo,
        FreightStatus::Aceito,
        FreightStatus::EmAndamento,
        FreightStatus::Concluido,
        FreightStatus::Cancelado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FreightStatus::Pendente => "pendente",
            FreightStatus::Ativo => "ativo",
            FreightStatus::Aceito => "aceito",
            FreightStatus::EmAndamento => "em_andamento",
            FreightStatus::Concluido => "concluido",
            FreightStatus::Cancelado => "cancelado",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FreightStatus::Pendente => "Pendente",
            FreightStatus::Ativo => "Ativo",
            FreightStatus::Aceito => "Aceito",
            FreightStatus::EmAndamento => "Em andamento",
            FreightStatus::Concluido => "Concluído",
            FreightStatus::Cancelado => "Cancelado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FreightStatus::Concluido | FreightStatus::Cancelado)
    }

    /// Next status along the main flow, if any
    pub fn next_in_flow(&self) -> Option<FreightStatus> {
        match self {
            FreightStatus::Pendente => Some(FreightStatus::Ativo),
            FreightStatus::Ativo => Some(FreightStatus::Aceito),
            FreightStatus::Aceito => Some(FreightStatus::EmAndamento),
            FreightStatus::EmAndamento => Some(FreightStatus::Concluido),
            FreightStatus::Concluido | FreightStatus::Cancelado => None,
        }
    }

    pub fn can_transition_to(&self, next: FreightStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == FreightStatus::Cancelado || self.next_in_flow() == Some(next)
    }

    /// Validate a move to `next`, returning the new status
    pub fn transition(self, next: FreightStatus) -> Result<FreightStatus, Error> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition(format!(
                "{} -> {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

impl fmt::Display for FreightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FreightStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| Error::InvalidValue(format!("unknown status: {}", s)))
    }
}

/// Who pays the tolls and on which leg
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TollPolicy {
    #[serde(rename = "pagador", default)]
    pub payer: Option<String>,
    #[serde(rename = "sentido", default)]
    pub direction: Option<String>,
}

/// Freight attributes as written to the store, without identity or timestamps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreightPayload {
    #[serde(rename = "tipo_frete", default, deserialize_with = "null_as_default")]
    pub freight_type: FreightType,
    #[serde(rename = "origem_cidade", default, deserialize_with = "null_as_default")]
    pub origin_city: String,
    #[serde(rename = "origem_estado", default, deserialize_with = "null_as_default")]
    pub origin_state: String,
    /// Legacy direct destination pair
    #[serde(rename = "destino_cidade", default, skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<String>,
    #[serde(rename = "destino_estado", default, skip_serializing_if = "Option::is_none")]
    pub destination_state: Option<String>,
    #[serde(rename = "destinos", default)]
    pub destinations: Value,
    #[serde(rename = "paradas", default)]
    pub stops: Value,
    #[serde(rename = "tipo_mercadoria", default)]
    pub merchandise_type: Option<String>,
    #[serde(rename = "peso", default)]
    pub weight: Option<f64>,
    #[serde(rename = "valor_carga", default)]
    pub cargo_value: Option<f64>,
    #[serde(rename = "tipos_veiculos", default)]
    pub vehicle_types: Value,
    #[serde(rename = "tipos_carrocerias", default)]
    pub body_types: Value,
    /// Price tables embedded by older clients; newer ones use the price-table store
    #[serde(rename = "tabelas_preco", default, skip_serializing_if = "Value::is_null")]
    pub price_tables: Value,
    #[serde(rename = "beneficios", default)]
    pub benefits: Value,
    #[serde(rename = "regras_agendamento", default)]
    pub scheduling_rules: Value,
    #[serde(rename = "precisa_ajudante", default, deserialize_with = "null_as_default")]
    pub needs_helper: bool,
    #[serde(rename = "precisa_rastreador", default, deserialize_with = "null_as_default")]
    pub needs_tracker: bool,
    #[serde(rename = "precisa_seguro", default, deserialize_with = "null_as_default")]
    pub needs_insurance: bool,
    #[serde(rename = "pedagio", default, deserialize_with = "null_as_default")]
    pub toll: TollPolicy,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: FreightStatus,
    #[serde(rename = "colaboradores", default, deserialize_with = "null_as_default")]
    pub collaborator_ids: Vec<String>,
    #[serde(rename = "empresa_id", default)]
    pub company_id: Option<String>,
}

/// A persisted freight row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreightRecord {
    pub id: String,
    /// Human-readable code assigned by the store (e.g. "FRT-000042")
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(flatten)]
    pub payload: FreightPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Price-table row before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRowDraft {
    pub freight_id: String,
    pub vehicle_type: String,
    pub km_start: f64,
    pub km_end: f64,
    pub price: f64,
}

/// Persisted price-table row, keyed by freight id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTableRow {
    pub id: String,
    pub freight_id: String,
    pub vehicle_type: String,
    pub km_start: f64,
    pub km_end: f64,
    pub price: f64,
}

impl PriceTableRow {
    pub fn from_draft(id: String, draft: PriceRowDraft) -> Self {
        Self {
            id,
            freight_id: draft.freight_id,
            vehicle_type: draft.vehicle_type,
            km_start: draft.km_start,
            km_end: draft.km_end,
            price: draft.price,
        }
    }
}

/// Company collaborator (read-only, joined for display)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Shipping company (read-only, joined for display)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub company_name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub phone: String,
}
