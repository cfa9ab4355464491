//! Batch orchestration: raw records in, the full artifact set out.
//!
//! One pass per run, entirely in memory. The duplicate-contract-ID index
//! is the only cross-record state; it is built once up front and read-only
//! during rule evaluation. Reprocessing the same batch reproduces
//! byte-identical output.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{FlaggedProject, Project, ProjectContext, TriageColor};
use crate::error::{Result, ValidatorError};
use crate::observability::metrics;
use crate::pipeline::processing::candidates::select_candidates;
use crate::pipeline::processing::completeness;
use crate::pipeline::processing::detect::{AnomalyDetector, DuplicateIndex};
use crate::pipeline::processing::normalize::{normalize_record, RawRecord};
use crate::pipeline::processing::report::{contractor_report, ContractorIntelligenceReport};
use crate::pipeline::processing::score::suspicion_score;
use crate::pipeline::processing::triage;
use crate::registry::{ContractorRegistry, LocationWatchlist};

/// Counts per triage color across the flagged set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageBreakdown {
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
    pub grey: usize,
}

/// Records missing the accountability basics, counted over the cleaned set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountabilityGaps {
    pub missing_contractor: usize,
    pub missing_location: usize,
    pub missing_cost: usize,
}

/// Batch-level statistics, the fifth output artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_projects: usize,
    pub total_contract_value: f64,
    pub flagged_projects: usize,
    pub triage_breakdown: TriageBreakdown,
    pub satellite_candidates: usize,
    pub accountability_gaps: AccountabilityGaps,
}

/// Everything one batch run produces.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Every successfully normalized project, canonical schema, no flags
    pub projects: Vec<Project>,
    /// Projects with at least one flag, sorted by (priority, score desc)
    pub flagged: Vec<FlaggedProject>,
    /// Location-eligible flagged projects for satellite verification
    pub candidates: Vec<FlaggedProject>,
    /// Per-contractor aggregation of watch-list matches, when any exist
    pub contractor_report: Option<ContractorIntelligenceReport>,
    pub summary: ValidationSummary,
    /// Malformed raw records skipped during normalization
    pub skipped_records: usize,
}

/// The validation engine: normalizes a raw batch, runs the anomaly rules,
/// classifies, and assembles the output artifacts.
pub struct ValidationEngine {
    detector: AnomalyDetector,
    locations: LocationWatchlist,
}

impl ValidationEngine {
    /// Engine with the given contractor registry, the built-in location
    /// watch-list, and the current year.
    pub fn new(registry: ContractorRegistry) -> Self {
        Self {
            detector: AnomalyDetector::new(registry),
            locations: LocationWatchlist::known_hotspots(),
        }
    }

    /// Fully injected construction, for tests and embedders.
    pub fn with_parts(detector: AnomalyDetector, locations: LocationWatchlist) -> Self {
        Self { detector, locations }
    }

    /// Run the engine over one raw batch.
    ///
    /// An empty batch is the engine's only fatal condition. Individual
    /// malformed records are skipped with a counted warning.
    pub fn run(&self, raw_records: &[RawRecord]) -> Result<BatchOutcome> {
        if raw_records.is_empty() {
            return Err(ValidatorError::EmptyBatch);
        }
        info!(records = raw_records.len(), "starting validation batch");

        let mut projects = Vec::with_capacity(raw_records.len());
        let mut skipped_records = 0;
        for (index, raw) in raw_records.iter().enumerate() {
            match normalize_record(raw) {
                Ok(project) => {
                    metrics::normalize::record_processed();
                    projects.push(project);
                }
                Err(error) => {
                    warn!(record = index, %error, "skipping malformed raw record");
                    metrics::normalize::record_skipped();
                    skipped_records += 1;
                }
            }
        }

        // The one cross-record pre-pass: contract-ID frequencies.
        let duplicates = DuplicateIndex::build(&projects);

        let mut flagged = Vec::new();
        for project in &projects {
            let data_completeness = completeness::assess(project);
            let flags = self.detector.detect(project, &duplicates);
            if flags.is_empty() {
                continue;
            }

            for flag in &flags {
                metrics::detector::flag_raised(flag.kind.as_str());
            }
            metrics::detector::project_flagged();

            let score = suspicion_score(&flags);
            let triage = triage::classify(score, data_completeness.is_incomplete);
            metrics::triage::classified(triage.color.as_str());

            flagged.push(FlaggedProject {
                project: project.clone(),
                flag_count: flags.len(),
                flags,
                suspicion_score: score,
                max_severity: triage.severity,
                data_completeness,
                context: self.build_context(project),
                triage,
            });
        }

        // Most urgent first; score breaks priority ties. Stable, so equal
        // (priority, score) pairs keep batch order.
        flagged.sort_by(|a, b| {
            a.triage
                .priority
                .cmp(&b.triage.priority)
                .then_with(|| b.suspicion_score.cmp(&a.suspicion_score))
        });

        let candidates = select_candidates(&flagged);
        metrics::candidates::selected(candidates.len() as u64);
        let contractor_report = contractor_report(&flagged, self.detector.registry());
        let summary = self.summarize(&projects, &flagged, candidates.len());
        metrics::batch::processed(projects.len());

        info!(
            projects = projects.len(),
            flagged = flagged.len(),
            candidates = candidates.len(),
            skipped = skipped_records,
            "validation batch complete"
        );

        Ok(BatchOutcome {
            projects,
            flagged,
            candidates,
            contractor_report,
            summary,
            skipped_records,
        })
    }

    /// Contextual annotations: watch-list note, project age, satellite
    /// eligibility. Never contributes to the score.
    fn build_context(&self, project: &Project) -> ProjectContext {
        let location_note = project.province.as_deref().and_then(|province| {
            self.locations
                .note_for(province)
                .map(|note| format!("{province}: {note}"))
        });
        let satellite_eligible = project.has_location();
        let satellite_note = if satellite_eligible {
            "Eligible (Location Present)".to_string()
        } else {
            "Missing Municipality or Province".to_string()
        };

        ProjectContext {
            high_risk_location: location_note.is_some(),
            location_note,
            project_age_years: project
                .year
                .map(|year| self.detector.evaluation_year() - year),
            satellite_eligible,
            satellite_note,
        }
    }

    fn summarize(
        &self,
        projects: &[Project],
        flagged: &[FlaggedProject],
        candidate_count: usize,
    ) -> ValidationSummary {
        let mut breakdown = TriageBreakdown::default();
        for project in flagged {
            match project.triage.color {
                TriageColor::Red => breakdown.red += 1,
                TriageColor::Yellow => breakdown.yellow += 1,
                TriageColor::Green => breakdown.green += 1,
                TriageColor::Grey => breakdown.grey += 1,
            }
        }

        ValidationSummary {
            total_projects: projects.len(),
            total_contract_value: projects
                .iter()
                .map(|p| p.contract_cost.unwrap_or(0.0))
                .sum(),
            flagged_projects: flagged.len(),
            triage_breakdown: breakdown,
            satellite_candidates: candidate_count,
            accountability_gaps: AccountabilityGaps {
                missing_contractor: projects
                    .iter()
                    .filter(|p| p.contractor.is_none())
                    .count(),
                missing_location: projects.iter().filter(|p| !p.has_location()).count(),
                missing_cost: projects
                    .iter()
                    .filter(|p| !p.contract_cost.map_or(false, |c| c > 0.0))
                    .count(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const YEAR: i32 = 2025;

    fn engine() -> ValidationEngine {
        ValidationEngine::with_parts(
            AnomalyDetector::with_evaluation_year(ContractorRegistry::coa_watchlist(), YEAR),
            LocationWatchlist::known_hotspots(),
        )
    }

    fn clean_record(id: &str) -> RawRecord {
        json!({
            "GlobalID": id,
            "ProjectDescription": "Construction of slope protection structure",
            "InfraYear": YEAR - 2,
            "Province": "Pampanga",
            "Municipality": "Lubao",
            "Contractor": "REPUTABLE BUILDERS CORP.",
            "ContractCost": 4_000_000.0,
            "ContractID": id,
            "StartDate": "2023-02-01",
            "CompletionDateActual": "2023-10-01"
        })
    }

    #[test]
    fn empty_batch_is_fatal() {
        assert!(matches!(engine().run(&[]), Err(ValidatorError::EmptyBatch)));
    }

    #[test]
    fn clean_batch_produces_no_flagged_projects() {
        let outcome = engine()
            .run(&[clean_record("P-1"), clean_record("P-2")])
            .unwrap();
        assert_eq!(outcome.projects.len(), 2);
        assert!(outcome.flagged.is_empty());
        assert!(outcome.candidates.is_empty());
        assert!(outcome.contractor_report.is_none());
        assert_eq!(outcome.summary.flagged_projects, 0);
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let raw = vec![clean_record("P-1"), json!("not an object")];
        let outcome = engine().run(&raw).unwrap();
        assert_eq!(outcome.projects.len(), 1);
        assert_eq!(outcome.skipped_records, 1);
    }

    #[test]
    fn hotspot_province_is_annotated() {
        let mut record = clean_record("P-1");
        record["Province"] = json!("Bulacan");
        record["ContractCost"] = json!(0); // force a flag so context is visible
        let outcome = engine().run(&[record]).unwrap();
        let context = &outcome.flagged[0].context;
        assert!(context.high_risk_location);
        assert!(context.location_note.as_deref().unwrap().starts_with("Bulacan:"));
        assert_eq!(outcome.flagged[0].context.project_age_years, Some(2));
    }

    #[test]
    fn flagged_set_sorts_by_priority_then_score() {
        // GREEN (priority 3, score 40): duplicate only.
        let mut green_a = clean_record("DUP-1");
        green_a["ContractID"] = json!("C-SAME");
        let mut green_b = clean_record("DUP-2");
        green_b["ContractID"] = json!("C-SAME");
        // RED (priority 1): blacklisted contractor.
        let mut red = clean_record("P-RED");
        red["Contractor"] = json!("SYMS CONSTRUCTION TRADING");
        // YELLOW (priority 2, score 70): inverted timeline.
        let mut yellow = clean_record("P-YEL");
        yellow["StartDate"] = json!("2023-10-01");
        yellow["CompletionDateActual"] = json!("2023-02-01");

        let outcome = engine().run(&[green_a, green_b, red, yellow]).unwrap();
        let ids: Vec<&str> = outcome
            .flagged
            .iter()
            .map(|p| p.project.project_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["P-RED", "P-YEL", "DUP-1", "DUP-2"]);
    }

    #[test]
    fn summary_counts_gaps_over_cleaned_set() {
        let mut no_contractor = clean_record("P-1");
        no_contractor["Contractor"] = json!("");
        let mut no_location = clean_record("P-2");
        no_location["Municipality"] = json!(null);
        let mut no_cost = clean_record("P-3");
        no_cost["ContractCost"] = json!("n/a");

        let outcome = engine()
            .run(&[no_contractor, no_location, no_cost, clean_record("P-4")])
            .unwrap();
        let gaps = &outcome.summary.accountability_gaps;
        assert_eq!(gaps.missing_contractor, 1);
        assert_eq!(gaps.missing_location, 1);
        assert_eq!(gaps.missing_cost, 1);
        assert_eq!(outcome.summary.total_projects, 4);
        assert_eq!(outcome.summary.total_contract_value, 12_000_000.0);
    }
}
