//! Output structures returned by the orchestrator and the pipelines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Candidate, EntertainmentRecommendations, ImproveReason, ReflectionState, Verdict};

/// Result of one judge/reflect step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    /// When the step finished
    pub timestamp: DateTime<Utc>,
    /// Final candidate (text possibly rewritten, verdict from the judge)
    pub candidate: Candidate,
    pub state: ReflectionState,
    pub reason: ImproveReason,
}

impl Improvement {
    pub fn new(candidate: Candidate, state: ReflectionState, reason: ImproveReason) -> Self {
        Self {
            timestamp: Utc::now(),
            candidate,
            state,
            reason,
        }
    }

    /// Final text and the judge's verdict
    pub fn into_pair(self) -> (String, Verdict) {
        (self.candidate.text, self.candidate.verdict)
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        format!(
            "{}[{}] score={} | round={} | {}{}",
            self.state.color_code(),
            self.state,
            display_score(self.candidate.verdict.total_score),
            self.candidate.round,
            self.reason.code(),
            ReflectionState::color_reset()
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "state={} | score={} | round={} | reason={}",
            self.state,
            display_score(self.candidate.verdict.total_score),
            self.candidate.round,
            self.reason.code()
        )
    }
}

/// One entry of a ranked caption list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCaption {
    pub caption: String,
    pub verdict: Verdict,
}

/// Everything produced for one mood in a single pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodReport {
    pub emotion: String,
    pub confidence: f64,
    /// Support message (judged, possibly rewritten)
    pub message: String,
    pub entertainment: EntertainmentRecommendations,
    pub captions: Vec<RankedCaption>,
}

/// Outcome of a one-shot generator call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorCheck {
    pub ok: bool,
    pub reply: Option<String>,
}

fn display_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.1}", s),
        None => "N/A".to_string(),
    }
}
