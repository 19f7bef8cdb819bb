//! VibeEngine: the facade the CLI and the HTTP layer call into
//!
//! Owns one generation collaborator and hands it to every pipeline. All
//! calls are blocking and request-scoped; nothing is shared between calls
//! except the collaborator itself.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::caption_pipeline::CaptionPipeline;
use crate::core::entertainment::EntertainmentPipeline;
use crate::core::generator::TextGenerator;
use crate::core::orchestrator::JudgeReflectOrchestrator;
use crate::core::recommendation_pipeline::RecommendationPipeline;
use tracing::info;
use crate::types::{
    Candidate, EntertainmentRecommendations, GeneratorCheck, Improvement, JudgeContext, MoodReport, RankedCaption,
    Verdict,
};
use crate::{DEFAULT_SCORE_THRESHOLD, MAX_REFLECTION_ROUNDS};

/// Prompt sent by `check_generator`
pub const GENERATOR_CHECK_PROMPT: &str = "Say hello in a fun way!";

/// Tunables shared by every pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub score_threshold: f64,
    pub max_rounds: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            max_rounds: MAX_REFLECTION_ROUNDS,
        }
    }
}

pub struct VibeEngine {
    settings: EngineSettings,
    generator: Arc<dyn TextGenerator>,
    orchestrator: JudgeReflectOrchestrator,
    captions: CaptionPipeline,
    recommendations: RecommendationPipeline,
    entertainment: EntertainmentPipeline,
}

impl VibeEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: EngineSettings) -> Self {
        let orchestrator = JudgeReflectOrchestrator::new(Arc::clone(&generator)).with_max_rounds(settings.max_rounds);
        Self {
            settings,
            captions: CaptionPipeline::with_orchestrator(Arc::clone(&generator), orchestrator.clone())
                .with_threshold(settings.score_threshold),
            recommendations: RecommendationPipeline::with_orchestrator(Arc::clone(&generator), orchestrator.clone())
                .with_threshold(settings.score_threshold),
            entertainment: EntertainmentPipeline::new(Arc::clone(&generator)),
            orchestrator,
            generator,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Judge caller-supplied candidates and return the top two
    pub fn score_caption_batch(&self, candidates: &[String], emotion: &str, user_text: &str) -> Vec<RankedCaption> {
        self.captions.score_caption_batch(candidates, emotion, user_text)
    }

    /// Generate, judge and rank captions
    pub fn generate_captions(&self, emotion: &str, user_text: &str) -> Vec<RankedCaption> {
        self.captions.generate_ranked(emotion, user_text)
    }

    pub fn generate_recommendation_text(&self, emotion: &str, confidence: f64, user_text: &str) -> String {
        self.recommendations.generate(emotion, confidence, user_text)
    }

    pub fn recommend_entertainment(&self, emotion: &str, confidence: f64, user_text: &str) -> EntertainmentRecommendations {
        self.entertainment.recommend(emotion, confidence, user_text)
    }

    /// Support message, entertainment and captions for one mood.
    /// Runs the three pipelines one after another on the same collaborator.
    pub fn analyze_complete(&self, emotion: &str, confidence: f64, user_text: &str) -> MoodReport {
        let message = self.generate_recommendation_text(emotion, confidence, user_text);
        let entertainment = self.recommend_entertainment(emotion, confidence, user_text);
        let captions = self.generate_captions(emotion, user_text);
        info!(emotion, captions = captions.len(), "mood analysis complete");

        MoodReport {
            emotion: emotion.to_string(),
            confidence,
            message,
            entertainment,
            captions,
        }
    }

    /// One raw generation call, nothing judged
    pub fn check_generator(&self) -> GeneratorCheck {
        let reply = self.generator.generate(GENERATOR_CHECK_PROMPT).map(|r| r.trim().to_string());
        GeneratorCheck {
            ok: reply.is_some(),
            reply,
        }
    }

    /// Judge one caption in isolation (diagnostics)
    pub fn judge_single(&self, text: &str, emotion: &str) -> (String, Verdict) {
        self.judge_single_detailed(text, emotion).into_pair()
    }

    /// Same as `judge_single`, keeping the final state and reason code
    pub fn judge_single_detailed(&self, text: &str, emotion: &str) -> Improvement {
        let ctx = JudgeContext::caption_debug(emotion).with_threshold(self.settings.score_threshold);
        self.orchestrator.improve(Candidate::new(text), &ctx)
    }
}
