//! Selects the flagged projects handed to the geocoding/satellite
//! verification pipeline. Eligibility depends only on location, never on
//! score; the ordering puts the most suspicious, most expensive projects
//! first.

use crate::constants::MAX_SATELLITE_CANDIDATES;
use crate::domain::FlaggedProject;

/// Filter to location-eligible projects, order by suspicion score then
/// contract cost (both descending), and cap the list for downstream API
/// limits. The sort is stable, so ties keep batch order.
pub fn select_candidates(flagged: &[FlaggedProject]) -> Vec<FlaggedProject> {
    let mut candidates: Vec<FlaggedProject> = flagged
        .iter()
        .filter(|p| p.context.satellite_eligible)
        .cloned()
        .collect();

    candidates.sort_by(|a, b| {
        b.suspicion_score.cmp(&a.suspicion_score).then_with(|| {
            let cost_a = a.project.contract_cost.unwrap_or(0.0);
            let cost_b = b.project.contract_cost.unwrap_or(0.0);
            cost_b.total_cmp(&cost_a)
        })
    });
    candidates.truncate(MAX_SATELLITE_CANDIDATES);
    candidates
}
