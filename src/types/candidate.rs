//! Candidate text moving through the judge/reflect loop

use serde::{Deserialize, Serialize};

use crate::types::Verdict;

/// One generated text plus its latest verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    /// Latest verdict (unavailable until judged)
    pub verdict: Verdict,
    /// 0 = as generated, 1 = after one reflection
    pub round: u32,
}

impl Candidate {
    /// Fresh, unjudged candidate
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            verdict: Verdict::unavailable(),
            round: 0,
        }
    }

    /// Same text, with a verdict attached
    pub fn judged(self, verdict: Verdict) -> Self {
        Self { verdict, ..self }
    }

    /// Rewritten text; the verdict is carried over, not refreshed
    pub fn reflected(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            round: self.round + 1,
            verdict: self.verdict,
        }
    }
}
