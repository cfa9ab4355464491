//! Watch-lists backing the anomaly detector: contractors flagged in COA
//! audit findings, and provinces with documented irregularity clusters.
//!
//! Both are explicitly constructed values injected into the detector, so
//! tests can swap in doubles and refreshed lists can be loaded from disk
//! without touching code.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Severity;
use crate::error::Result;

/// A registry entry for a known-problematic contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorProfile {
    /// Canonical contractor name as it appears in audit findings
    pub name: String,
    /// Free-text justification for the listing
    pub reason: String,
    /// Provenance citation (which audit body / report)
    pub source: String,
    pub severity: Severity,
    /// Responsible officer named in the findings, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer: Option<String>,
    /// Associated firms (joint-venture partners, successor entities)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associates: Vec<String>,
}

/// Uppercases a name and collapses runs of internal whitespace.
fn canonical(name: &str) -> String {
    name.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The spelling variants tried when matching a contractor name: the
/// canonical form, commas removed, periods removed, and `&` spelled out.
/// Exact variant equality only; no fuzzy or partial matching.
pub fn name_variants(name: &str) -> Vec<String> {
    let normalized = canonical(name);
    if normalized.is_empty() {
        return Vec::new();
    }
    vec![
        normalized.clone(),
        normalized.replace(',', ""),
        normalized.replace('.', ""),
        normalized.replace('&', "AND"),
    ]
}

/// Lookup of known-problematic contractors, keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct ContractorRegistry {
    entries: HashMap<String, ContractorProfile>,
}

impl ContractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of profiles. Later entries win on
    /// canonical-name collisions.
    pub fn from_profiles(profiles: impl IntoIterator<Item = ContractorProfile>) -> Self {
        let mut entries = HashMap::new();
        for profile in profiles {
            entries.insert(canonical(&profile.name), profile);
        }
        Self { entries }
    }

    /// Load a registry from a JSON file containing an array of profiles.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let profiles: Vec<ContractorProfile> = serde_json::from_str(&raw)?;
        Ok(Self::from_profiles(profiles))
    }

    /// Return the profile matching a contractor name, trying each spelling
    /// variant against the registry keys. `None` for blank names.
    pub fn lookup(&self, contractor: &str) -> Option<&ContractorProfile> {
        name_variants(contractor)
            .iter()
            .find_map(|variant| self.entries.get(variant))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ContractorProfile> {
        self.entries.values()
    }

    /// The built-in watch-list of contractors named in COA audit findings.
    /// Near-duplicate spellings are deliberate: the source data carries
    /// both punctuation forms for some firms.
    pub fn coa_watchlist() -> Self {
        fn entry(
            name: &str,
            reason: &str,
            source: &str,
            severity: Severity,
        ) -> ContractorProfile {
            ContractorProfile {
                name: name.to_string(),
                reason: reason.to_string(),
                source: source.to_string(),
                severity,
                officer: None,
                associates: Vec::new(),
            }
        }

        let profiles = vec![
            ContractorProfile {
                officer: Some("Sally N. Santos".to_string()),
                ..entry(
                    "SYMS CONSTRUCTION TRADING",
                    "Fully-paid but non-existent or substandard flood-control works in Bulacan",
                    "COA Bulacan fraud reports",
                    Severity::Critical,
                )
            },
            ContractorProfile {
                associates: vec!["L.R. TIQUI BUILDERS INC.".to_string()],
                ..entry(
                    "M3 KONSTRUCT CORPORATION",
                    "Projects built in wrong sites or having irregularities in Bulacan",
                    "COA Bulacan audit findings",
                    Severity::Critical,
                )
            },
            ContractorProfile {
                officer: Some("Mark Allan Arevalo".to_string()),
                ..entry(
                    "WAWAO BUILDERS",
                    "Flagged in COA Bulacan fraud findings for flood-mitigation projects",
                    "COA Bulacan fraud reports",
                    Severity::Critical,
                )
            },
            entry(
                "ST. TIMOTHY CONSTRUCTION CORP.",
                "Serious discrepancies in Bulacan flood-control works",
                "COA audit reports",
                Severity::Critical,
            ),
            entry(
                "ST. TIMOTHY CONSTRUCTION",
                "Serious discrepancies in Bulacan flood-control works",
                "COA audit reports",
                Severity::Critical,
            ),
            entry(
                "AMETHYST HORIZON BUILDERS & GENERAL CONTRACTOR AND DEVELOPMENT CORP.",
                "Substandard or misplaced works in Bulacan projects",
                "COA Bulacan audit findings",
                Severity::Critical,
            ),
            entry(
                "DARCY & ANNA BUILDERS & TRADING",
                "Implicated in flagged Bulacan flood-control projects",
                "COA reports",
                Severity::Critical,
            ),
            entry(
                "L.R. TIQUI BUILDERS, INC.",
                "Named in flagged Bulacan works, associated with M3 Konstract JVs",
                "COA reports",
                Severity::Critical,
            ),
            entry(
                "L.R. TIQUI BUILDERS INC.",
                "Named in flagged Bulacan works, associated with M3 Konstract JVs",
                "COA reports",
                Severity::Critical,
            ),
            entry(
                "SBD BUILDERS INC.",
                "Expired licenses and bid issues in Cebu City Sports Center rehab",
                "COA Cebu City audit",
                Severity::High,
            ),
            entry(
                "ADL GENERAL CONSTRUCTION",
                "Previously blacklisted firm (Mountain Province procurement issues)",
                "COA procurement audit",
                Severity::High,
            ),
            entry(
                "TAWID BUILDERS CORP.",
                "Appeared in re-awarded contracts after ADL blacklisting",
                "COA procurement audit",
                Severity::Medium,
            ),
            entry(
                "R.U. AQUINO CONSTRUCTION & DEVELOPMENT CORP.",
                "Conflict-of-interest concerns in COA new building contract",
                "COA building contract audit",
                Severity::Medium,
            ),
            entry(
                "LE BRON CONSTRUCTION",
                "JV partner in flagged contract with conflict-of-interest concerns",
                "COA building contract audit",
                Severity::Medium,
            ),
            entry(
                "TRIPLE 8 CONSTRUCTION",
                "Historical COA flag (verify source)",
                "COA reports (to be verified)",
                Severity::Medium,
            ),
            entry(
                "TOPNOTCH CATALYST BUILDERS",
                "Historical COA flag (verify source)",
                "COA reports (to be verified)",
                Severity::Medium,
            ),
        ];
        Self::from_profiles(profiles)
    }
}

/// Provinces with documented clusters of flagged projects. Used for
/// contextual annotation only; a watch-listed location never raises a flag
/// by itself.
#[derive(Debug, Clone, Default)]
pub struct LocationWatchlist {
    notes: HashMap<String, String>,
}

impl LocationWatchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_notes(notes: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            notes: notes.into_iter().collect(),
        }
    }

    pub fn note_for(&self, province: &str) -> Option<&str> {
        self.notes.get(province).map(String::as_str)
    }

    /// The built-in province watch-list from COA findings.
    pub fn known_hotspots() -> Self {
        Self::from_notes([
            (
                "Bulacan".to_string(),
                "High incidence of COA-flagged ghost projects and irregular flood-control works"
                    .to_string(),
            ),
            (
                "Quezon City".to_string(),
                "Multiple fraud cases documented".to_string(),
            ),
            (
                "Maguindanao".to_string(),
                "Audit findings show irregularities".to_string(),
            ),
            (
                "Cebu City".to_string(),
                "Sports center rehab irregularities flagged".to_string(),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_cover_punctuation_forms() {
        let variants = name_variants("l.r. tiqui   builders, inc.");
        assert!(variants.contains(&"L.R. TIQUI BUILDERS, INC.".to_string()));
        assert!(variants.contains(&"L.R. TIQUI BUILDERS INC.".to_string()));
        assert!(variants.contains(&"LR TIQUI BUILDERS, INC".to_string()));
    }

    #[test]
    fn blank_name_has_no_variants() {
        assert!(name_variants("   ").is_empty());
        assert!(ContractorRegistry::coa_watchlist().lookup("").is_none());
    }

    #[test]
    fn matches_both_tiqui_spellings() {
        let registry = ContractorRegistry::coa_watchlist();
        let with_comma = registry.lookup("L.R. TIQUI BUILDERS, INC.").unwrap();
        let without_comma = registry.lookup("L.R. TIQUI BUILDERS INC.").unwrap();
        assert_eq!(with_comma.reason, without_comma.reason);
        assert_eq!(with_comma.severity, Severity::Critical);
    }

    #[test]
    fn matching_is_case_insensitive_and_whitespace_tolerant() {
        let registry = ContractorRegistry::coa_watchlist();
        assert!(registry.lookup("wawao   builders").is_some());
        assert!(registry.lookup("Syms Construction Trading").is_some());
    }

    #[test]
    fn ampersand_names_match_directly() {
        let registry = ContractorRegistry::coa_watchlist();
        assert!(registry.lookup("DARCY & ANNA BUILDERS & TRADING").is_some());
    }

    #[test]
    fn no_partial_matching() {
        let registry = ContractorRegistry::coa_watchlist();
        assert!(registry.lookup("WAWAO").is_none());
        assert!(registry.lookup("WAWAO BUILDERS CORPORATION").is_none());
    }

    #[test]
    fn profile_metadata_survives() {
        let registry = ContractorRegistry::coa_watchlist();
        let syms = registry.lookup("SYMS CONSTRUCTION TRADING").unwrap();
        assert_eq!(syms.officer.as_deref(), Some("Sally N. Santos"));
        let m3 = registry.lookup("M3 KONSTRUCT CORPORATION").unwrap();
        assert_eq!(m3.associates, vec!["L.R. TIQUI BUILDERS INC.".to_string()]);
    }

    #[test]
    fn hotspot_lookup_is_exact() {
        let watchlist = LocationWatchlist::known_hotspots();
        assert!(watchlist.note_for("Bulacan").is_some());
        assert!(watchlist.note_for("bulacan").is_none());
        assert!(watchlist.note_for("Pampanga").is_none());
    }
}
