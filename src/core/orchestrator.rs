//! Judge-reflect orchestrator: critique, then conditionally improve
//!
//! One step, always terminal:
//! - judge unavailable → SKIPPED (original kept, empty verdict)
//! - total ≥ threshold → JUDGED (original kept)
//! - total < threshold or absent → reflect once → REFLECTED,
//!   or SKIPPED when the rewrite call fails or rounds are used up
//!
//! The rewrite is not re-judged; the returned verdict is the one that
//! triggered it.

use std::sync::Arc;

use tracing::info;

use crate::core::generator::TextGenerator;
use crate::core::judge::Judge;
use crate::core::reflector::Reflector;
use crate::types::{Candidate, Improvement, ImproveReason, JudgeContext, ReflectionState, Verdict};
use crate::MAX_REFLECTION_ROUNDS;

/// Composes `Judge` and `Reflector`
#[derive(Clone)]
pub struct JudgeReflectOrchestrator {
    judge: Judge,
    reflector: Reflector,
    max_rounds: u32,
}

impl JudgeReflectOrchestrator {
    /// Orchestrator with the default rounds limit
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::from_parts(
            Judge::new(Arc::clone(&generator)),
            Reflector::new(generator),
            MAX_REFLECTION_ROUNDS,
        )
    }

    pub fn from_parts(judge: Judge, reflector: Reflector, max_rounds: u32) -> Self {
        Self {
            judge,
            reflector,
            max_rounds,
        }
    }

    /// Reflection passes allowed per candidate (0 disables reflection)
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Final text and the judge's verdict
    pub fn judge_and_improve(&self, candidate_text: &str, ctx: &JudgeContext) -> (String, Verdict) {
        self.improve(Candidate::new(candidate_text), ctx).into_pair()
    }

    /// Run one judge/reflect step on a candidate
    pub fn improve(&self, candidate: Candidate, ctx: &JudgeContext) -> Improvement {
        let verdict = self.judge.judge(&candidate.text, ctx);
        let outcome = self.decide(candidate.judged(verdict), ctx);

        info!(
            target: "vibecheck::orchestrator",
            state = %outcome.state,
            reason = outcome.reason.code(),
            score = ?outcome.candidate.verdict.total_score,
            round = outcome.candidate.round,
            "{}",
            outcome.candidate.text
        );
        outcome
    }

    fn decide(&self, candidate: Candidate, ctx: &JudgeContext) -> Improvement {
        if !candidate.verdict.is_available() {
            return Improvement::new(candidate, ReflectionState::Skipped, ImproveReason::J001_JUDGE_UNAVAILABLE);
        }

        if !candidate.verdict.is_below(ctx.score_threshold) {
            return Improvement::new(candidate, ReflectionState::Judged, ImproveReason::J004_THRESHOLD_MET);
        }

        if candidate.round >= self.max_rounds {
            return Improvement::new(candidate, ReflectionState::Skipped, ImproveReason::J006_ROUNDS_EXHAUSTED);
        }

        let trigger = if candidate.verdict.total_score.is_none() {
            ImproveReason::J002_SCORE_MISSING
        } else {
            ImproveReason::J003_BELOW_THRESHOLD
        };

        match self.reflector.reflect(&candidate.text, ctx, &candidate.verdict) {
            Some(rewritten) => Improvement::new(candidate.reflected(rewritten), ReflectionState::Reflected, trigger),
            None => Improvement::new(candidate, ReflectionState::Skipped, ImproveReason::J005_REFLECTION_FAILED),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
