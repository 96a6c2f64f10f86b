//! Markdown and JSON report generation.
//!
//! This module renders a [`Report`] built from query results.

use super::{QueryOutcome, Report, ReportMetadata, Section};
use crate::models::{Client, Vehicle};
use std::collections::BTreeMap;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, title: &str, include_metadata: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", title));

    if include_metadata {
        output.push_str(&generate_metadata_section(&report.metadata));
    }

    output.push_str(&generate_table_of_contents(report, include_metadata));

    for section in &report.sections {
        output.push_str(&generate_query_section(section));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .replace(' ', "-")
}

/// Escape text for a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Vehicles:** {}\n", metadata.summary.vehicles));
    section.push_str(&format!("- **Clients:** {}\n", metadata.summary.clients));
    section.push_str(&format!("- **Orders:** {}\n", metadata.summary.orders));
    if metadata.summary.dangling_orders > 0 {
        section.push_str(&format!(
            "- **Orders with unknown client or vehicle:** {}\n",
            metadata.summary.dangling_orders
        ));
    }
    section.push('\n');

    if !metadata.makes.is_empty() {
        section.push_str("### Fleet by Make\n\n");
        section.push_str("| Make | Vehicles |\n");
        section.push_str("|:---|:---:|\n");
        for (make, count) in &metadata.makes {
            section.push_str(&format!("| {} | {} |\n", cell(make), count));
        }
        section.push('\n');
    }

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report, include_metadata: bool) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    if include_metadata {
        toc.push_str("- [Metadata](#metadata)\n");
    }
    for section in &report.sections {
        toc.push_str(&format!("- [{}](#{})\n", section.title, anchor(&section.title)));
    }
    toc.push('\n');

    toc
}

/// Generate the section for one query.
fn generate_query_section(section: &Section) -> String {
    let mut out = String::new();

    out.push_str(&format!("## {}\n\n", section.title));

    if section.outcome.is_empty() {
        out.push_str("*No results.*\n\n");
        return out;
    }

    match &section.outcome {
        QueryOutcome::Vehicles(vehicles) => out.push_str(&generate_vehicle_table(vehicles)),
        QueryOutcome::Makers(makers) => {
            for make in makers {
                out.push_str(&format!("- {}\n", make));
            }
            out.push('\n');
        }
        QueryOutcome::BodyTypes(body_types) => {
            for body_type in body_types {
                out.push_str(&format!("- {}\n", body_type));
            }
            out.push('\n');
        }
        QueryOutcome::Groups(groups) => out.push_str(&generate_groups(groups)),
        QueryOutcome::Clients(clients) => out.push_str(&generate_client_table(clients)),
    }

    out
}

fn generate_vehicle_table(vehicles: &[Vehicle]) -> String {
    let mut table = String::new();

    table.push_str("| ID | Make | Body Type | Year | Odometer |\n");
    table.push_str("|---:|:---|:---|:---:|---:|\n");
    for v in vehicles {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            v.id,
            cell(&v.make),
            v.body_type,
            v.year_of_production,
            v.odometer
        ));
    }
    table.push('\n');

    table
}

fn generate_groups(groups: &BTreeMap<String, Vec<Vehicle>>) -> String {
    let mut out = String::new();

    for (make, vehicles) in groups {
        out.push_str(&format!("### {} ({})\n\n", make, vehicles.len()));
        out.push_str(&generate_vehicle_table(vehicles));
    }

    out
}

fn generate_client_table(clients: &[Client]) -> String {
    let mut table = String::new();

    table.push_str("| Rank | ID | Name | Email |\n");
    table.push_str("|:---:|---:|:---|:---|\n");
    for (i, c) in clients.iter().enumerate() {
        table.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i + 1,
            c.id,
            cell(&c.name),
            cell(&c.email)
        ));
    }
    table.push('\n');

    table
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by agency-insights*\n".to_string()
}
