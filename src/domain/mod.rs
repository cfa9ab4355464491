use serde::{Deserialize, Serialize};

/// A public-works contract record in canonical form.
///
/// Every field is optional: the normalizer null-fills anything the raw
/// source omits or that fails to parse, and downstream rules treat absent
/// data as "no evidence" rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: Option<String>,
    pub project_description: Option<String>,
    pub year: Option<i32>,
    pub region: Option<String>,
    pub province: Option<String>,
    pub municipality: Option<String>,
    pub barangay: Option<String>,
    pub type_of_work: Option<String>,
    pub contractor: Option<String>,
    pub contract_cost: Option<f64>,
    pub contract_id: Option<String>,
    pub legislative_district: Option<String>,
    pub district_engineering_office: Option<String>,
    pub start_date: Option<String>,
    pub completion_date: Option<String>,
}

/// Placeholder values the raw source uses when no contractor has been
/// awarded or entered yet
pub const CONTRACTOR_PLACEHOLDERS: [&str; 3] = ["TBA", "N/A", "NONE"];

impl Project {
    /// Location eligibility for the satellite verification pipeline:
    /// both municipality and province must be on record.
    pub fn has_location(&self) -> bool {
        self.municipality.is_some() && self.province.is_some()
    }

    /// The contractor name, if one is actually on record: non-empty after
    /// trimming and not a placeholder value.
    pub fn named_contractor(&self) -> Option<&str> {
        self.contractor
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && !CONTRACTOR_PLACEHOLDERS.contains(name))
    }
}

/// The closed set of anomaly rules. Each kind carries a fixed weight; the
/// weight table is part of the external contract shared with downstream
/// consumers (database loader, API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagKind {
    BlacklistedContractor,
    InvalidTimeline,
    MissingContractor,
    DuplicateContractId,
    MissingCost,
    IncompleteLocation,
}

impl FlagKind {
    /// Evidence weight contributed to the suspicion score.
    pub const fn weight(self) -> u32 {
        match self {
            FlagKind::BlacklistedContractor => 80,
            FlagKind::InvalidTimeline => 70,
            FlagKind::MissingContractor => 50,
            FlagKind::DuplicateContractId => 40,
            FlagKind::MissingCost => 40,
            FlagKind::IncompleteLocation => 30,
        }
    }

    /// All kinds in their canonical evaluation/emission order.
    pub const fn all() -> [FlagKind; 6] {
        [
            FlagKind::BlacklistedContractor,
            FlagKind::InvalidTimeline,
            FlagKind::MissingContractor,
            FlagKind::DuplicateContractId,
            FlagKind::MissingCost,
            FlagKind::IncompleteLocation,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlagKind::BlacklistedContractor => "BLACKLISTED_CONTRACTOR",
            FlagKind::InvalidTimeline => "INVALID_TIMELINE",
            FlagKind::MissingContractor => "MISSING_CONTRACTOR",
            FlagKind::DuplicateContractId => "DUPLICATE_CONTRACT_ID",
            FlagKind::MissingCost => "MISSING_COST",
            FlagKind::IncompleteLocation => "INCOMPLETE_LOCATION",
        }
    }
}

/// One unit of weighted evidence of irregularity attached to a project.
/// Immutable once created; a project carries at most one flag per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    #[serde(rename = "type")]
    pub kind: FlagKind,
    /// Human-readable explanation of what fired
    pub reason: String,
    /// The field (or field group) that triggered the rule
    pub field: String,
    pub weight: u32,
    /// How many times the contract ID occurs across the batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_count: Option<usize>,
    /// Provenance citation for registry matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Severity labels shared between registry entries, the weight → severity
/// bucketing, and triage outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

/// Qualitative risk bucket assigned by triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriageColor {
    Red,
    Yellow,
    Green,
    Grey,
}

impl TriageColor {
    pub fn as_str(self) -> &'static str {
        match self {
            TriageColor::Red => "RED",
            TriageColor::Yellow => "YELLOW",
            TriageColor::Green => "GREEN",
            TriageColor::Grey => "GREY",
        }
    }
}

/// Final triage classification for a flagged project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub color: TriageColor,
    pub rating: String,
    pub action: String,
    /// 1 = most urgent, 4 = least
    pub priority: u8,
    pub severity: Severity,
}

/// How much of the critical field set a project actually fills in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// 0–100, rounded to one decimal
    pub score: f64,
    pub completed_fields: usize,
    pub total_fields: usize,
    pub missing: Vec<String>,
    /// Fewer than four critical fields present
    pub is_incomplete: bool,
}

/// Contextual annotations attached alongside the flags: location watch-list
/// notes, project age, and satellite pipeline eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_note: Option<String>,
    pub high_risk_location: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_age_years: Option<i32>,
    pub satellite_eligible: bool,
    pub satellite_note: String,
}

/// A project that accumulated at least one flag, with the full assessment
/// attached. This is the record shape handed to persistence and the
/// geocoding/satellite pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedProject {
    #[serde(flatten)]
    pub project: Project,
    pub flags: Vec<Flag>,
    pub flag_count: usize,
    /// min(100, sum of flag weights)
    pub suspicion_score: u32,
    pub max_severity: Severity,
    pub data_completeness: CompletenessReport,
    pub triage: TriageResult,
    pub context: ProjectContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_kind_weights_match_contract() {
        assert_eq!(FlagKind::BlacklistedContractor.weight(), 80);
        assert_eq!(FlagKind::InvalidTimeline.weight(), 70);
        assert_eq!(FlagKind::MissingContractor.weight(), 50);
        assert_eq!(FlagKind::DuplicateContractId.weight(), 40);
        assert_eq!(FlagKind::MissingCost.weight(), 40);
        assert_eq!(FlagKind::IncompleteLocation.weight(), 30);
    }

    #[test]
    fn flag_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&FlagKind::BlacklistedContractor).unwrap();
        assert_eq!(json, "\"BLACKLISTED_CONTRACTOR\"");
        let json = serde_json::to_string(&FlagKind::DuplicateContractId).unwrap();
        assert_eq!(json, "\"DUPLICATE_CONTRACT_ID\"");
    }

    #[test]
    fn severity_and_color_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Unknown).unwrap(), "\"UNKNOWN\"");
        assert_eq!(serde_json::to_string(&TriageColor::Grey).unwrap(), "\"GREY\"");
    }

    #[test]
    fn named_contractor_rejects_placeholders() {
        let mut project = Project {
            contractor: Some("TBA".to_string()),
            ..Project::default()
        };
        assert_eq!(project.named_contractor(), None);
        project.contractor = Some("  ".to_string());
        assert_eq!(project.named_contractor(), None);
        project.contractor = Some("WAWAO BUILDERS".to_string());
        assert_eq!(project.named_contractor(), Some("WAWAO BUILDERS"));
    }

    #[test]
    fn has_location_requires_both_fields() {
        let mut project = Project {
            municipality: Some("Malolos".to_string()),
            ..Project::default()
        };
        assert!(!project.has_location());
        project.province = Some("Bulacan".to_string());
        assert!(project.has_location());
    }
}
