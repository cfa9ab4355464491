/// Artifact file name constants to ensure consistency across the codebase
/// These are the file names the downstream loaders (database, geocoder) read

pub const CLEAN_PROJECTS_FILE: &str = "projects.json";
pub const FLAGGED_PROJECTS_FILE: &str = "flagged_projects.json";
pub const SATELLITE_CANDIDATES_FILE: &str = "satellite_candidates.json";
pub const CONTRACTOR_REPORT_FILE: &str = "contractor_report.json";
pub const VALIDATION_SUMMARY_FILE: &str = "validation_summary.json";

/// Upper bound on satellite verification candidates per run, to stay under
/// downstream geocoding API limits
pub const MAX_SATELLITE_CANDIDATES: usize = 100;
