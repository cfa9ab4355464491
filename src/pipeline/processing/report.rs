//! Contractor intelligence reporting: aggregates every project that
//! matched the contractor watch-list into per-contractor groups for the
//! audit summary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{FlagKind, FlaggedProject};
use crate::registry::ContractorRegistry;

/// Cap on the per-project description excerpt, in characters
const DESCRIPTION_EXCERPT_LEN: usize = 100;

/// Summary of all watch-list matches in a batch, grouped by contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorIntelligenceReport {
    pub total_projects: usize,
    pub total_value: f64,
    pub unique_contractors: usize,
    pub contractors: Vec<ContractorGroup>,
}

/// One watch-listed contractor and the flagged projects awarded to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorGroup {
    pub name: String,
    pub coa_reason: String,
    pub coa_source: String,
    pub project_count: usize,
    pub total_value: f64,
    pub projects: Vec<ProjectBrief>,
}

/// The per-project excerpt carried in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBrief {
    pub project_id: Option<String>,
    pub description: String,
    pub location: String,
    pub year: Option<i32>,
    pub cost: f64,
    pub suspicion_score: u32,
}

fn brief(project: &FlaggedProject) -> ProjectBrief {
    let location = format!(
        "{}, {}",
        project.project.municipality.as_deref().unwrap_or("N/A"),
        project.project.province.as_deref().unwrap_or("N/A"),
    );
    ProjectBrief {
        project_id: project.project.project_id.clone(),
        description: project
            .project
            .project_description
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(DESCRIPTION_EXCERPT_LEN)
            .collect(),
        location,
        year: project.project.year,
        cost: project.project.contract_cost.unwrap_or(0.0),
        suspicion_score: project.suspicion_score,
    }
}

/// Build the intelligence report from the flagged set. `None` when no
/// project carries a blacklisted-contractor flag.
pub fn contractor_report(
    flagged: &[FlaggedProject],
    registry: &ContractorRegistry,
) -> Option<ContractorIntelligenceReport> {
    let matched: Vec<&FlaggedProject> = flagged
        .iter()
        .filter(|p| p.flags.iter().any(|f| f.kind == FlagKind::BlacklistedContractor))
        .collect();
    if matched.is_empty() {
        return None;
    }

    // Group by uppercased contractor name, keeping first-seen order so the
    // report is stable across runs.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&FlaggedProject>> = HashMap::new();
    for &project in &matched {
        let name = project
            .project
            .contractor
            .as_deref()
            .unwrap_or("Unknown")
            .to_uppercase();
        if !groups.contains_key(&name) {
            order.push(name.clone());
        }
        groups.entry(name).or_default().push(project);
    }

    let mut contractors: Vec<ContractorGroup> = order
        .into_iter()
        .map(|name| {
            let mut members = groups.remove(&name).unwrap_or_default();
            members.sort_by(|a, b| b.suspicion_score.cmp(&a.suspicion_score));

            let profile = registry.lookup(&name);
            ContractorGroup {
                coa_reason: profile.map_or("Unknown".to_string(), |p| p.reason.clone()),
                coa_source: profile.map_or("Unknown".to_string(), |p| p.source.clone()),
                project_count: members.len(),
                total_value: members
                    .iter()
                    .map(|p| p.project.contract_cost.unwrap_or(0.0))
                    .sum(),
                projects: members.iter().map(|p| brief(p)).collect(),
                name,
            }
        })
        .collect();
    contractors.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));

    Some(ContractorIntelligenceReport {
        total_projects: matched.len(),
        total_value: matched
            .iter()
            .map(|p| p.project.contract_cost.unwrap_or(0.0))
            .sum(),
        unique_contractors: contractors.len(),
        contractors,
    })
}
