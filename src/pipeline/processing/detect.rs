//! The anomaly rule set. Each rule inspects one project (plus the
//! batch-level duplicate index) and either emits exactly one flag of its
//! kind or stays silent. A rule that cannot evaluate for lack of data does
//! not fire; nothing here returns an error.

use std::collections::HashMap;

use chrono::{Datelike, Utc};

use crate::domain::{Flag, FlagKind, Project};
use crate::pipeline::processing::normalize::parse_flexible_date;
use crate::registry::ContractorRegistry;

/// Contract-ID occurrence counts for one batch. Built once per run so each
/// project's duplicate check is an O(1) lookup instead of a rescan of the
/// full list.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    counts: HashMap<String, usize>,
}

impl DuplicateIndex {
    pub fn build(projects: &[Project]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for project in projects {
            if let Some(contract_id) = &project.contract_id {
                *counts.entry(contract_id.clone()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn count(&self, contract_id: &str) -> usize {
        self.counts.get(contract_id).copied().unwrap_or(0)
    }
}

/// Evaluates the fixed rule set against projects, using an injected
/// contractor registry. The evaluation year is explicit state so the
/// project-age rule is testable without clock control.
pub struct AnomalyDetector {
    registry: ContractorRegistry,
    evaluation_year: i32,
}

impl AnomalyDetector {
    pub fn new(registry: ContractorRegistry) -> Self {
        Self::with_evaluation_year(registry, Utc::now().year())
    }

    pub fn with_evaluation_year(registry: ContractorRegistry, evaluation_year: i32) -> Self {
        Self {
            registry,
            evaluation_year,
        }
    }

    pub fn registry(&self) -> &ContractorRegistry {
        &self.registry
    }

    pub fn evaluation_year(&self) -> i32 {
        self.evaluation_year
    }

    /// Run every rule against one project. Flags come back in the
    /// [`FlagKind::all`] enumeration order so batch output is stable
    /// across runs.
    pub fn detect(&self, project: &Project, duplicates: &DuplicateIndex) -> Vec<Flag> {
        FlagKind::all()
            .iter()
            .filter_map(|kind| self.evaluate(*kind, project, duplicates))
            .collect()
    }

    fn evaluate(
        &self,
        kind: FlagKind,
        project: &Project,
        duplicates: &DuplicateIndex,
    ) -> Option<Flag> {
        match kind {
            FlagKind::BlacklistedContractor => self.check_blacklisted_contractor(project),
            FlagKind::InvalidTimeline => self.check_invalid_timeline(project),
            FlagKind::MissingContractor => self.check_missing_contractor(project),
            FlagKind::DuplicateContractId => self.check_duplicate_contract_id(project, duplicates),
            FlagKind::MissingCost => self.check_missing_cost(project),
            FlagKind::IncompleteLocation => self.check_incomplete_location(project),
        }
    }

    fn check_blacklisted_contractor(&self, project: &Project) -> Option<Flag> {
        let contractor = project.contractor.as_deref()?;
        let profile = self.registry.lookup(contractor)?;
        Some(Flag {
            kind: FlagKind::BlacklistedContractor,
            reason: format!("Contractor flagged by COA: {}", profile.reason),
            field: "contractor".to_string(),
            weight: FlagKind::BlacklistedContractor.weight(),
            duplicate_count: None,
            source: Some(profile.source.clone()),
        })
    }

    fn check_invalid_timeline(&self, project: &Project) -> Option<Flag> {
        let start = parse_flexible_date(project.start_date.as_deref()?)?;
        let completion = parse_flexible_date(project.completion_date.as_deref()?)?;
        if completion >= start {
            return None;
        }
        Some(Flag {
            kind: FlagKind::InvalidTimeline,
            reason: "Completion date is before start date".to_string(),
            field: "dates".to_string(),
            weight: FlagKind::InvalidTimeline.weight(),
            duplicate_count: None,
            source: None,
        })
    }

    fn check_missing_contractor(&self, project: &Project) -> Option<Flag> {
        if project.named_contractor().is_some() {
            return None;
        }
        // Projects younger than a year are exempt: the contract may simply
        // not be awarded yet. A missing year counts as the current year.
        let age = self.evaluation_year - project.year.unwrap_or(self.evaluation_year);
        if age < 1 {
            return None;
        }
        Some(Flag {
            kind: FlagKind::MissingContractor,
            reason: "Project has no contractor on record".to_string(),
            field: "contractor".to_string(),
            weight: FlagKind::MissingContractor.weight(),
            duplicate_count: None,
            source: None,
        })
    }

    fn check_duplicate_contract_id(
        &self,
        project: &Project,
        duplicates: &DuplicateIndex,
    ) -> Option<Flag> {
        let contract_id = project.contract_id.as_deref()?;
        let count = duplicates.count(contract_id);
        if count <= 1 {
            return None;
        }
        Some(Flag {
            kind: FlagKind::DuplicateContractId,
            reason: format!("Contract ID \"{contract_id}\" appears {count} times"),
            field: "contract_id".to_string(),
            weight: FlagKind::DuplicateContractId.weight(),
            duplicate_count: Some(count),
            source: None,
        })
    }

    fn check_missing_cost(&self, project: &Project) -> Option<Flag> {
        if project.contract_cost.map_or(false, |cost| cost > 0.0) {
            return None;
        }
        Some(Flag {
            kind: FlagKind::MissingCost,
            reason: "No contract cost recorded".to_string(),
            field: "contract_cost".to_string(),
            weight: FlagKind::MissingCost.weight(),
            duplicate_count: None,
            source: None,
        })
    }

    fn check_incomplete_location(&self, project: &Project) -> Option<Flag> {
        if project.has_location() {
            return None;
        }
        Some(Flag {
            kind: FlagKind::IncompleteLocation,
            reason: "Missing location data".to_string(),
            field: "location".to_string(),
            weight: FlagKind::IncompleteLocation.weight(),
            duplicate_count: None,
            source: None,
        })
    }
}
