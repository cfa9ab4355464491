//! Triage classification: an ordered rule table evaluated top-to-bottom,
//! first match wins. The row order encodes the precedence: a critical
//! score beats incomplete data, incomplete data beats a merely high
//! score.

use crate::domain::{Severity, TriageColor, TriageResult};

/// Score at or above which a project is critical (RED)
pub const CRITICAL_SCORE: u32 = 80;

/// Score at or above which a project is high risk (YELLOW)
pub const HIGH_RISK_SCORE: u32 = 60;

struct TriageRule {
    applies: fn(score: u32, is_incomplete: bool) -> bool,
    color: TriageColor,
    rating: &'static str,
    action: &'static str,
    priority: u8,
    severity: Severity,
}

static TRIAGE_RULES: [TriageRule; 4] = [
    TriageRule {
        applies: |score, _| score >= CRITICAL_SCORE,
        color: TriageColor::Red,
        rating: "Critical Risk",
        action: "IMMEDIATE INVESTIGATION. Strong evidence of anomaly.",
        priority: 1,
        severity: Severity::Critical,
    },
    TriageRule {
        applies: |_, is_incomplete| is_incomplete,
        color: TriageColor::Grey,
        rating: "Incomplete Data",
        action: "Data validation required.",
        priority: 4,
        severity: Severity::Unknown,
    },
    TriageRule {
        applies: |score, _| score >= HIGH_RISK_SCORE,
        color: TriageColor::Yellow,
        rating: "High Risk",
        action: "Priority investigation.",
        priority: 2,
        severity: Severity::High,
    },
    TriageRule {
        applies: |_, _| true,
        color: TriageColor::Green,
        rating: "Low Risk",
        action: "Continuous monitoring.",
        priority: 3,
        severity: Severity::Low,
    },
];

/// Classify a project from its suspicion score and completeness verdict.
pub fn classify(score: u32, is_incomplete: bool) -> TriageResult {
    let rule = TRIAGE_RULES
        .iter()
        .find(|rule| (rule.applies)(score, is_incomplete))
        .unwrap_or(&TRIAGE_RULES[TRIAGE_RULES.len() - 1]);

    TriageResult {
        color: rule.color,
        rating: rule.rating.to_string(),
        action: rule.action.to_string(),
        priority: rule.priority,
        severity: rule.severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_score_wins_over_incomplete_data() {
        let result = classify(85, true);
        assert_eq!(result.color, TriageColor::Red);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.priority, 1);
    }

    #[test]
    fn incomplete_data_wins_below_critical() {
        let result = classify(50, true);
        assert_eq!(result.color, TriageColor::Grey);
        assert_eq!(result.severity, Severity::Unknown);
        assert_eq!(result.priority, 4);

        // Even a high-risk score defers to incompleteness
        let result = classify(70, true);
        assert_eq!(result.color, TriageColor::Grey);
    }

    #[test]
    fn score_thresholds_bucket_complete_projects() {
        assert_eq!(classify(80, false).color, TriageColor::Red);
        assert_eq!(classify(79, false).color, TriageColor::Yellow);
        assert_eq!(classify(60, false).color, TriageColor::Yellow);
        assert_eq!(classify(59, false).color, TriageColor::Green);
        assert_eq!(classify(0, false).color, TriageColor::Green);
    }

    #[test]
    fn ratings_and_actions_are_stable() {
        let red = classify(100, false);
        assert_eq!(red.rating, "Critical Risk");
        assert_eq!(red.action, "IMMEDIATE INVESTIGATION. Strong evidence of anomaly.");

        let green = classify(10, false);
        assert_eq!(green.rating, "Low Risk");
        assert_eq!(green.action, "Continuous monitoring.");
    }
}
