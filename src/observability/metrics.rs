//! Stage counters for the validation engine, using Prometheus naming
//! conventions. Recording only: the surrounding deployment installs an
//! exporter/recorder; without one these are no-ops.

/// Enum representing all metric names used in the system
/// This eliminates magic strings and provides compile-time safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Normalize metrics
    NormalizeRecordsProcessed,
    NormalizeRecordsSkipped,

    // Detector metrics
    DetectorFlagsRaised,
    DetectorProjectsFlagged,

    // Triage metrics
    TriageClassified,

    // Candidate metrics
    CandidatesSelected,

    // Batch metrics
    BatchesProcessed,
    BatchSize,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NormalizeRecordsProcessed => "gpd_normalize_records_processed_total",
            MetricName::NormalizeRecordsSkipped => "gpd_normalize_records_skipped_total",
            MetricName::DetectorFlagsRaised => "gpd_detector_flags_raised_total",
            MetricName::DetectorProjectsFlagged => "gpd_detector_projects_flagged_total",
            MetricName::TriageClassified => "gpd_triage_classified_total",
            MetricName::CandidatesSelected => "gpd_candidates_selected_total",
            MetricName::BatchesProcessed => "gpd_batches_processed_total",
            MetricName::BatchSize => "gpd_batch_size",
        }
    }
}

pub mod normalize {
    use super::MetricName;

    /// Record a successfully normalized record
    pub fn record_processed() {
        ::metrics::counter!(MetricName::NormalizeRecordsProcessed.as_str()).increment(1);
    }

    /// Record a malformed record skipped by the batch engine
    pub fn record_skipped() {
        ::metrics::counter!(MetricName::NormalizeRecordsSkipped.as_str()).increment(1);
    }
}

pub mod detector {
    use super::MetricName;

    /// Record one raised flag, labelled by rule kind
    pub fn flag_raised(kind: &'static str) {
        ::metrics::counter!(MetricName::DetectorFlagsRaised.as_str(), "kind" => kind)
            .increment(1);
    }

    /// Record a project that accumulated at least one flag
    pub fn project_flagged() {
        ::metrics::counter!(MetricName::DetectorProjectsFlagged.as_str()).increment(1);
    }
}

pub mod triage {
    use super::MetricName;

    /// Record a triage classification, labelled by color
    pub fn classified(color: &'static str) {
        ::metrics::counter!(MetricName::TriageClassified.as_str(), "color" => color).increment(1);
    }
}

pub mod candidates {
    use super::MetricName;

    /// Record the number of satellite candidates selected for a batch
    pub fn selected(count: u64) {
        ::metrics::counter!(MetricName::CandidatesSelected.as_str()).increment(count);
    }
}

pub mod batch {
    use super::MetricName;

    /// Record a completed batch run and its size
    pub fn processed(size: usize) {
        ::metrics::counter!(MetricName::BatchesProcessed.as_str()).increment(1);
        ::metrics::histogram!(MetricName::BatchSize.as_str()).record(size as f64);
    }
}
