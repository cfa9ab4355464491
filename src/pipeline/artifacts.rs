//! Writes the batch outcome as the JSON artifact set consumed by the
//! persistence loader, the HTTP API, and the geocoding pipeline.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::constants::{
    CLEAN_PROJECTS_FILE, CONTRACTOR_REPORT_FILE, FLAGGED_PROJECTS_FILE,
    SATELLITE_CANDIDATES_FILE, VALIDATION_SUMMARY_FILE,
};
use crate::error::Result;
use crate::pipeline::engine::BatchOutcome;

fn write_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    info!(path = %path.display(), "artifact written");
    Ok(path)
}

/// Write all artifacts for one batch outcome into `dir`, creating it if
/// needed. The contractor report file is only written when matches exist.
/// Returns the written paths.
pub fn write_artifacts(outcome: &BatchOutcome, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = vec![
        write_json(dir, CLEAN_PROJECTS_FILE, &outcome.projects)?,
        write_json(dir, FLAGGED_PROJECTS_FILE, &outcome.flagged)?,
        write_json(dir, SATELLITE_CANDIDATES_FILE, &outcome.candidates)?,
        write_json(dir, VALIDATION_SUMMARY_FILE, &outcome.summary)?,
    ];
    if let Some(report) = &outcome.contractor_report {
        written.push(write_json(dir, CONTRACTOR_REPORT_FILE, report)?);
    }
    Ok(written)
}
