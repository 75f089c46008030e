//! Complete freight card assembled from one record and its joins

use serde::Serialize;

use super::locations::{render_destinations, render_stops, LocationLine};
use super::price_tables::{render_price_rows, render_price_tables, PriceRow};
use super::selections::{render_body_types, render_vehicle_types, SelectionLine};
use super::{render_badges, render_scheduling_rules};
use crate::model::{Collaborator, Company, FreightRecord, PriceTableRow};
use crate::normalize::FreightField;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreightView {
    pub id: String,
    pub code: String,
    pub freight_type: String,
    pub status: String,
    pub origin: String,
    pub destinations: Vec<LocationLine>,
    pub stops: Vec<LocationLine>,
    pub cargo: Vec<String>,
    pub vehicles: Vec<SelectionLine>,
    pub bodies: Vec<SelectionLine>,
    pub price_rows: Vec<PriceRow>,
    pub benefits: Vec<String>,
    pub scheduling_rules: Vec<String>,
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toll: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub collaborators: Vec<String>,
    pub created_at: String,
}

/// Build the display card.
///
/// Rows from the price-table store win over the legacy `tabelas_preco`
/// field; the embedded field is only rendered when the store has none.
pub fn render_freight(
    record: &FreightRecord,
    price_rows: &[PriceTableRow],
    company: Option<&Company>,
    collaborators: &[Collaborator],
) -> FreightView {
    let p = &record.payload;

    let price_rows = if price_rows.is_empty() {
        render_price_tables(&p.price_tables)
    } else {
        render_price_rows(price_rows)
    };

    FreightView {
        id: record.id.clone(),
        code: record.code.clone(),
        freight_type: p.freight_type.label().to_string(),
        status: p.status.label().to_string(),
        origin: join_place(&p.origin_city, &p.origin_state),
        destinations: render_destinations(
            p.destination_city.as_deref(),
            p.destination_state.as_deref(),
            &p.destinations,
        ),
        stops: render_stops(&p.stops),
        cargo: cargo_lines(record),
        vehicles: render_vehicle_types(&p.vehicle_types),
        bodies: render_body_types(&p.body_types),
        price_rows,
        benefits: render_badges(FreightField::Benefits, &p.benefits),
        scheduling_rules: render_scheduling_rules(&p.scheduling_rules),
        requirements: requirement_lines(record),
        toll: toll_line(record),
        notes: p.notes.clone().filter(|n| !n.trim().is_empty()),
        company: company.map(company_line),
        collaborators: collaborators.iter().map(collaborator_line).collect(),
        created_at: record.created_at.format("%d/%m/%Y %H:%M").to_string(),
    }
}

fn join_place(city: &str, state: &str) -> String {
    match (city.trim(), state.trim()) {
        ("", "") => "-".to_string(),
        (city, "") => city.to_string(),
        ("", state) => state.to_string(),
        (city, state) => format!("{} - {}", city, state),
    }
}

fn cargo_lines(record: &FreightRecord) -> Vec<String> {
    let p = &record.payload;
    let mut lines = Vec::new();
    if let Some(kind) = p.merchandise_type.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("Mercadoria: {}", kind));
    }
    if let Some(weight) = p.weight {
        lines.push(format!("Peso: {} kg", weight));
    }
    if let Some(value) = p.cargo_value {
        lines.push(format!("Valor: R$ {:.2}", value));
    }
    lines
}

fn requirement_lines(record: &FreightRecord) -> Vec<String> {
    let p = &record.payload;
    [
        (p.needs_helper, "Ajudante"),
        (p.needs_tracker, "Rastreador"),
        (p.needs_insurance, "Seguro"),
    ]
    .into_iter()
    .filter(|(flag, _)| *flag)
    .map(|(_, label)| label.to_string())
    .collect()
}

fn toll_line(record: &FreightRecord) -> Option<String> {
    let toll = &record.payload.toll;
    match (toll.payer.as_deref(), toll.direction.as_deref()) {
        (None, None) => None,
        (Some(payer), None) => Some(format!("Pedágio: {}", payer)),
        (None, Some(direction)) => Some(format!("Pedágio ({})", direction)),
        (Some(payer), Some(direction)) => Some(format!("Pedágio: {} ({})", payer, direction)),
    }
}

fn company_line(company: &Company) -> String {
    let contact: Vec<&str> = [company.contact_name.as_str(), company.phone.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if contact.is_empty() {
        company.company_name.clone()
    } else {
        format!("{} ({})", company.company_name, contact.join(", "))
    }
}

fn collaborator_line(collaborator: &Collaborator) -> String {
    let mut parts = vec![collaborator.name.as_str()];
    for part in [collaborator.sector.as_str(), collaborator.phone.as_str()] {
        if !part.is_empty() {
            parts.push(part);
        }
    }
    if let Some(email) = collaborator.email.as_deref() {
        parts.push(email);
    }
    parts.join(" · ")
}
