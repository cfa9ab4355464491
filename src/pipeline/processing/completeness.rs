//! Measures how many of the critical accountability fields a project
//! actually fills in. A project missing most of them cannot be risk-rated
//! meaningfully and is routed to the GREY triage bucket instead.

use crate::domain::{CompletenessReport, Project};

/// Minimum meaningful description length, in characters
const MIN_DESCRIPTION_LEN: usize = 10;

/// Fewer completed fields than this marks the record incomplete
const INCOMPLETE_THRESHOLD: usize = 4;

/// The critical fields, in report order.
const CRITICAL_FIELDS: [&str; 7] = [
    "contractor",
    "contract_cost",
    "start_date",
    "completion_date",
    "municipality",
    "province",
    "project_description",
];

fn field_present(project: &Project, field: &str) -> bool {
    match field {
        "contractor" => project.named_contractor().is_some(),
        "contract_cost" => project.contract_cost.map_or(false, |cost| cost > 0.0),
        "start_date" => project.start_date.is_some(),
        "completion_date" => project.completion_date.is_some(),
        "municipality" => project.municipality.is_some(),
        "province" => project.province.is_some(),
        "project_description" => project
            .project_description
            .as_deref()
            .map_or(false, |d| d.trim().chars().count() >= MIN_DESCRIPTION_LEN),
        _ => false,
    }
}

/// Assess the critical field set of one project.
pub fn assess(project: &Project) -> CompletenessReport {
    let missing: Vec<String> = CRITICAL_FIELDS
        .iter()
        .filter(|field| !field_present(project, field))
        .map(|field| field.to_string())
        .collect();
    let total = CRITICAL_FIELDS.len();
    let completed = total - missing.len();

    CompletenessReport {
        score: (completed as f64 / total as f64 * 1000.0).round() / 10.0,
        completed_fields: completed,
        total_fields: total,
        missing,
        is_incomplete: completed < INCOMPLETE_THRESHOLD,
    }
}
