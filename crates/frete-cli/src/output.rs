//! Output formatting module

use frete_app::app::freight_service::{FreightSummary, NormalizedView};
use frete_domain::model::{CreatedFreight, FreightRecord};
use frete_domain::render::{FreightView, LocationLine, SelectionLine};
use frete_domain::FanOutError;
use frete_types::{OutputFormat, Result};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn output_created(output_format: OutputFormat, created: &[CreatedFreight]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(created);
    }

    println!("\nFreights Created");
    println!("================");
    println!("{:<12} {:<30} {:>11}", "Code", "Destination", "Price rows");
    println!("{}", "-".repeat(55));
    for freight in created {
        println!(
            "{:<12} {:<30} {:>11}",
            freight.code,
            truncate(&place(&freight.destination.city, &freight.destination.state), 30),
            freight.price_rows
        );
    }
    println!("\n{} freight(s) created", created.len());
    Ok(())
}

/// Report what a failed fan-out left behind; always on stderr
pub fn output_partial(err: &FanOutError) {
    if err.compensated {
        eprintln!("Submission rolled back; no freights were kept.");
        return;
    }
    if err.committed.is_empty() {
        return;
    }
    eprintln!(
        "{} freight(s) were created before the failure:",
        err.committed.len()
    );
    for freight in &err.committed {
        let note = if freight.price_rows == 0 { " (no price rows)" } else { "" };
        eprintln!(
            "  {}  {}{}",
            freight.code,
            place(&freight.destination.city, &freight.destination.state),
            note
        );
    }
}

pub fn output_list(output_format: OutputFormat, freights: &[FreightSummary]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(freights);
    }

    println!("Freights");
    println!("========");
    if freights.is_empty() {
        println!("No freights found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<14} {:<22} {:<22} {:<16}",
        "Code", "Status", "Origin", "Destination", "Created"
    );
    println!("{}", "-".repeat(90));
    for freight in freights {
        println!(
            "{:<12} {:<14} {:<22} {:<22} {:<16}",
            freight.code,
            freight.status,
            truncate(&freight.origin, 22),
            truncate(&freight.destination, 22),
            freight.created_at
        );
    }
    println!("\nTotal: {}", freights.len());
    Ok(())
}

pub fn output_view(output_format: OutputFormat, view: &FreightView) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(view);
    }

    println!("\n{} - {}", view.code, view.freight_type);
    println!("{}", "=".repeat(view.code.chars().count() + view.freight_type.chars().count() + 3));
    println!("Status:    {}", view.status);
    println!("Origin:    {}", view.origin);
    println!("Created:   {}", view.created_at);

    print_locations("Destinations", &view.destinations);
    print_locations("Stops", &view.stops);
    print_lines("Cargo", &view.cargo);
    print_selections("Vehicles", &view.vehicles);
    print_selections("Bodies", &view.bodies);

    if !view.price_rows.is_empty() {
        println!("\n--- Price table ---");
        for row in &view.price_rows {
            println!("  {}", row);
        }
    }

    print_lines("Benefits", &view.benefits);
    print_lines("Scheduling", &view.scheduling_rules);
    print_lines("Requirements", &view.requirements);

    if let Some(ref toll) = view.toll {
        println!("\n{}", toll);
    }
    if let Some(ref company) = view.company {
        println!("\nCompany:   {}", company);
    }
    print_lines("Collaborators", &view.collaborators);
    if let Some(ref notes) = view.notes {
        println!("\nNotes:\n{}", notes);
    }
    Ok(())
}

pub fn output_record(output_format: OutputFormat, heading: &str, record: &FreightRecord) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(record);
    }
    println!("{}: {} ({})", heading, record.code, record.payload.status.label());
    Ok(())
}

pub fn output_normalized(output_format: OutputFormat, view: &NormalizedView) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(view);
    }

    println!(
        "Adapter: {} v{}{}",
        view.adapter,
        view.version,
        view.field
            .as_deref()
            .map(|f| format!(" (field {})", f))
            .unwrap_or_default()
    );
    if view.entries.is_empty() {
        println!("No entries.");
    }
    for (idx, entry) in view.entries.iter().enumerate() {
        println!("{:>3}. {}", idx + 1, entry.title);
        if !entry.subtitle.is_empty() {
            println!("     {}", entry.subtitle);
        }
    }
    Ok(())
}

fn print_locations(title: &str, lines: &[LocationLine]) {
    if lines.is_empty() {
        return;
    }
    println!("\n--- {} ---", title);
    for line in lines {
        match line.heading {
            Some(ref heading) => println!("  [{}] {}", heading, line.summary()),
            None => println!("  {}", line.summary()),
        }
        for detail in &line.details {
            println!("      {}", detail);
        }
    }
}

fn print_selections(title: &str, lines: &[SelectionLine]) {
    if lines.is_empty() {
        return;
    }
    println!("\n--- {} ---", title);
    for line in lines {
        let mut text = line.label.clone();
        if let Some(ref category) = line.category {
            text.push_str(&format!(" [{}]", category));
        }
        if let Some(ref detail) = line.detail {
            text.push_str(&format!(" - {}", detail));
        }
        println!("  {}", text);
    }
}

fn print_lines(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("\n--- {} ---", title);
    for line in lines {
        println!("  {}", line);
    }
}

fn place(city: &str, state: &str) -> String {
    if state.is_empty() {
        city.to_string()
    } else {
        format!("{} - {}", city, state)
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
