use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;

/// Qualitative verdict derived from the feasibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityStatus {
    Favorable,
    Average,
    Difficult,
}

impl FeasibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FeasibilityStatus::Favorable => "favorable",
            FeasibilityStatus::Average => "average",
            FeasibilityStatus::Difficult => "difficult",
        }
    }
}

/// Thresholds are inclusive lower bounds.
pub(crate) fn status_for_score(score: u8, config: &ScoringConfig) -> FeasibilityStatus {
    if score >= config.favorable_threshold {
        FeasibilityStatus::Favorable
    } else if score >= config.average_threshold {
        FeasibilityStatus::Average
    } else {
        FeasibilityStatus::Difficult
    }
}
