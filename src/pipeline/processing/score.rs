//! Suspicion score aggregation. Pure and commutative: the score depends
//! only on which flags fired, never on their order.

use crate::domain::{Flag, Severity};

/// Upper bound on the suspicion score.
pub const MAX_SUSPICION_SCORE: u32 = 100;

/// Sum of flag weights, capped at [`MAX_SUSPICION_SCORE`].
pub fn suspicion_score(flags: &[Flag]) -> u32 {
    flags
        .iter()
        .map(|flag| flag.weight)
        .sum::<u32>()
        .min(MAX_SUSPICION_SCORE)
}

/// The weight/score → severity bucketing shared with downstream consumers
/// (database loader, API). Any consumer translating weights to labels must
/// reproduce exactly these cut-offs.
pub fn severity_for_weight(weight: u32) -> Severity {
    match weight {
        80.. => Severity::Critical,
        60..=79 => Severity::High,
        40..=59 => Severity::Medium,
        _ => Severity::Low,
    }
}
