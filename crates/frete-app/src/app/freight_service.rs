//! Freight Service - create, browse and move freights through their lifecycle
//!
//! Wires the domain writer and renderers to a freight repository and the
//! collaborator/company directory. Freights are addressed by id or by code.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use frete_domain::extract::{
    display_text, selection_text, subtitle, Role, LABEL_PRIORITY, LOCATION_DETAIL_ROLES,
    LOCATION_PRIORITY, SELECTION_PRIORITY, SUBTITLE_ROLES,
};
use frete_domain::model::{CreatedFreight, FreightRecord, FreightStatus, FreightSubmission};
use frete_domain::normalize::{builtin_registry, normalize, FreightField, Normalized};
use frete_domain::render::{render_destinations, render_freight, render_vehicle_types, FreightView};
use frete_domain::repository::{DirectoryRepository, FreightRepository};
use frete_domain::service::{self, FailurePolicy, FanOutError, FanOutWriter};
use frete_infra::load_destinations_from_csv;
use frete_types::{Error, Result};

/// One line of the freight list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreightSummary {
    pub id: String,
    pub code: String,
    pub status: String,
    pub freight_type: String,
    pub origin: String,
    pub destination: String,
    pub vehicles: Vec<String>,
    pub created_at: String,
}

/// Labelled entry as shown by `normalize`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryLine {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
}

/// Normalizer output for one raw field value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub adapter: String,
    pub version: u32,
    pub entries: Vec<EntryLine>,
}

pub struct FreightService<'a, R, D>
where
    R: FreightRepository + ?Sized,
    D: DirectoryRepository + ?Sized,
{
    freights: &'a R,
    directory: &'a D,
    policy: FailurePolicy,
}

impl<'a, R, D> FreightService<'a, R, D>
where
    R: FreightRepository + ?Sized,
    D: DirectoryRepository + ?Sized,
{
    pub fn new(freights: &'a R, directory: &'a D) -> Self {
        Self {
            freights,
            directory,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fan a submission out into one freight per destination
    pub fn create(
        &self,
        submission: &FreightSubmission,
    ) -> std::result::Result<Vec<CreatedFreight>, FanOutError> {
        FanOutWriter::new(self.freights)
            .with_policy(self.policy)
            .create_freights(submission)
    }

    /// Freights ordered by code, optionally only those in `status`
    pub fn list(&self, status: Option<FreightStatus>) -> Result<Vec<FreightSummary>> {
        let records = self.freights.find_all()?;
        Ok(records
            .iter()
            .filter(|record| status.map_or(true, |s| record.payload.status == s))
            .map(summarize)
            .collect())
    }

    /// Look a freight up by id, then by code
    pub fn resolve(&self, id_or_code: &str) -> Result<FreightRecord> {
        if let Some(record) = self.freights.find_by_id(id_or_code)? {
            return Ok(record);
        }
        self.freights
            .find_by_code(id_or_code)?
            .ok_or_else(|| Error::NotFound(format!("freight {}", id_or_code)))
    }

    /// Full display card with price rows, company and collaborators joined
    pub fn show(&self, id_or_code: &str) -> Result<FreightView> {
        let record = self.resolve(id_or_code)?;
        let price_rows = self.freights.price_rows_for(&record.id)?;
        let company = match record.payload.company_id.as_deref() {
            Some(id) => self.directory.find_company(id)?,
            None => None,
        };
        let collaborators = self
            .directory
            .find_collaborators(&record.payload.collaborator_ids)?;
        Ok(render_freight(
            &record,
            &price_rows,
            company.as_ref(),
            &collaborators,
        ))
    }

    pub fn transition(&self, id_or_code: &str, next: FreightStatus) -> Result<FreightRecord> {
        let record = self.resolve(id_or_code)?;
        service::transition_status(self.freights, &record.id, next)
    }

    pub fn delete(&self, id_or_code: &str) -> Result<FreightRecord> {
        let record = self.resolve(id_or_code)?;
        service::delete_freight(self.freights, &record.id)
    }
}

fn summarize(record: &FreightRecord) -> FreightSummary {
    let p = &record.payload;
    let destination = render_destinations(
        p.destination_city.as_deref(),
        p.destination_state.as_deref(),
        &p.destinations,
    )
    .first()
    .map(|line| line.summary())
    .unwrap_or_else(|| "-".to_string());

    FreightSummary {
        id: record.id.clone(),
        code: record.code.clone(),
        status: p.status.label().to_string(),
        freight_type: p.freight_type.label().to_string(),
        origin: format!("{} - {}", p.origin_city, p.origin_state),
        destination,
        vehicles: render_vehicle_types(&p.vehicle_types)
            .into_iter()
            .map(|line| line.label)
            .collect(),
        created_at: record.created_at.format("%d/%m/%Y %H:%M").to_string(),
    }
}

/// Read a submission JSON file; a destination CSV replaces its destination list
pub fn load_submission(path: &Path, destinations_csv: Option<&Path>) -> Result<FreightSubmission> {
    let content = std::fs::read_to_string(path)?;
    let mut submission: FreightSubmission = serde_json::from_str(&content)
        .map_err(|e| Error::InvalidSubmission(format!("{}: {}", path.display(), e)))?;

    if let Some(csv_path) = destinations_csv {
        submission.destinations = load_destinations_from_csv(csv_path)?;
        tracing::info!(
            count = submission.destinations.len(),
            file = %csv_path.display(),
            "destinations loaded from CSV"
        );
    }
    Ok(submission)
}

/// Normalize and label a raw value, through the field's adapters when given
pub fn inspect_value(field: Option<FreightField>, value: &Value) -> NormalizedView {
    let normalized = match field {
        Some(field) => builtin_registry().resolve(field, value),
        None => Normalized {
            adapter: "flatten",
            version: 0,
            entries: normalize(value),
        },
    };

    let entries = normalized
        .entries
        .iter()
        .map(|entry| match field {
            Some(FreightField::VehicleTypes | FreightField::BodyTypes) => EntryLine {
                title: selection_text(entry, SELECTION_PRIORITY),
                subtitle: subtitle(entry, &[Role::Category, Role::Capacity]),
            },
            Some(FreightField::Destinations | FreightField::Stops) => EntryLine {
                title: display_text(entry, LOCATION_PRIORITY),
                subtitle: subtitle(entry, LOCATION_DETAIL_ROLES),
            },
            _ => EntryLine {
                title: display_text(entry, LABEL_PRIORITY),
                subtitle: subtitle(entry, SUBTITLE_ROLES),
            },
        })
        .collect();

    NormalizedView {
        field: field.map(|f| f.column().to_string()),
        adapter: normalized.adapter.to_string(),
        version: normalized.version,
        entries,
    }
}
