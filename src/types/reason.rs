//! Reason codes for orchestrator decisions

use serde::{Deserialize, Serialize};

/// Why a candidate ended in its state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ImproveReason {
    /// Judge returned no text; nothing to reflect on
    J001_JUDGE_UNAVAILABLE,
    /// Judge answered but no total could be read; treated as below threshold
    J002_SCORE_MISSING,
    /// Total below threshold
    J003_BELOW_THRESHOLD,
    /// Total at or above threshold
    J004_THRESHOLD_MET,
    /// Reflection requested but the rewrite call returned nothing
    J005_REFLECTION_FAILED,
    /// Candidate already used its reflection rounds
    J006_ROUNDS_EXHAUSTED,
}

impl ImproveReason {
    /// Code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::J001_JUDGE_UNAVAILABLE => "J001_JUDGE_UNAVAILABLE",
            Self::J002_SCORE_MISSING => "J002_SCORE_MISSING",
            Self::J003_BELOW_THRESHOLD => "J003_BELOW_THRESHOLD",
            Self::J004_THRESHOLD_MET => "J004_THRESHOLD_MET",
            Self::J005_REFLECTION_FAILED => "J005_REFLECTION_FAILED",
            Self::J006_ROUNDS_EXHAUSTED => "J006_ROUNDS_EXHAUSTED",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::J001_JUDGE_UNAVAILABLE => "Judging unavailable, original kept",
            Self::J002_SCORE_MISSING => "No total score reported, rewritten",
            Self::J003_BELOW_THRESHOLD => "Below threshold, rewritten",
            Self::J004_THRESHOLD_MET => "Threshold met, original kept",
            Self::J005_REFLECTION_FAILED => "Rewrite unavailable, original kept",
            Self::J006_ROUNDS_EXHAUSTED => "Reflection rounds exhausted, original kept",
        }
    }
}

impl std::fmt::Display for ImproveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
