//! Recommendation pipeline: one empathetic message, judged and reflected once

use std::sync::Arc;

use tracing::debug;

use crate::core::generator::TextGenerator;
use crate::core::orchestrator::JudgeReflectOrchestrator;
use crate::types::{Candidate, Improvement, JudgeContext};
use crate::DEFAULT_SCORE_THRESHOLD;

#[derive(Clone)]
pub struct RecommendationPipeline {
    generator: Arc<dyn TextGenerator>,
    orchestrator: JudgeReflectOrchestrator,
    score_threshold: f64,
}

impl RecommendationPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let orchestrator = JudgeReflectOrchestrator::new(Arc::clone(&generator));
        Self::with_orchestrator(generator, orchestrator)
    }

    pub fn with_orchestrator(generator: Arc<dyn TextGenerator>, orchestrator: JudgeReflectOrchestrator) -> Self {
        Self {
            generator,
            orchestrator,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn build_prompt(&self, emotion: &str, confidence: f64, user_text: &str) -> String {
        format!(
            "You are a kind and understanding psychiatrist and mental health support assistant.\n\
             Based on this emotional analysis:\n\
             - Emotion: {emotion}\n\
             - Confidence: {confidence:.2}\n\
             - User Text: \"{user_text}\"\n\
             \n\
             Write a short, empathetic, and visually appealing response with ONLY the following:\n\
             - One acknowledgment line (friendly and warm) using heart icon (❤️ or similar).\n\
             - 4 self-care meaningful tips, each 3-4 words, start each with a capital letter, \
             each on its own line and start with a decorative icon.\n\
             - One blank line\n\
             - One gentle closing line encouraging professional help if needed.\n\
             \n\
             DO NOT include any movies, series, books, or music recommendations in this section.\n\
             Keep language simple and comforting.\n",
        )
    }

    /// Final message text. Falls back to a fixed message when generation fails.
    pub fn generate(&self, emotion: &str, confidence: f64, user_text: &str) -> String {
        match self.generate_detailed(emotion, confidence, user_text) {
            Some(improvement) => improvement.candidate.text,
            None => fallback_message(emotion),
        }
    }

    /// Judge/reflect outcome for the generated message; `None` when nothing was generated
    pub fn generate_detailed(&self, emotion: &str, confidence: f64, user_text: &str) -> Option<Improvement> {
        let Some(message) = self.generator.generate(&self.build_prompt(emotion, confidence, user_text)) else {
            debug!(emotion, "recommendation generation unavailable, using fallback message");
            return None;
        };
        debug!(emotion, message = %message, "raw recommendation");

        let ctx = JudgeContext::recommendation(emotion).with_threshold(self.score_threshold);
        Some(self.orchestrator.improve(Candidate::new(message), &ctx))
    }
}

/// Fixed support message naming the emotion
pub fn fallback_message(emotion: &str) -> String {
    format!(
        "I can sense you're feeling {} 🌿\n\
         🌞 Take slow deep breaths\n\
         💧 Drink some water\n\
         🕊️ Step outside for a few minutes\n\
         💫 Write down what's on your mind\n\
         \n\
         If this is serious, please consider professional help 💚",
        emotion
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::ScriptedGenerator;
    use crate::types::{ImproveReason, ReflectionState};

    const MESSAGE: &str = "I hear you ❤️\n🌿 Breathe in slowly\n💧 Sip some water\n🚶 Take a walk\n📓 Write it down\n\nReach out if it feels heavy.";

    #[test]
    fn test_fallback_when_generation_fails() {
        let gen = Arc::new(ScriptedGenerator::new());
        let pipeline = RecommendationPipeline::new(gen.clone());
        let text = pipeline.generate("sadness", 0.91, "rough week");

        assert!(text.starts_with("I can sense you're feeling sadness 🌿\n"));
        assert!(text.ends_with("\n\nIf this is serious, please consider professional help 💚"));
        assert_eq!(text.lines().count(), 7);
        assert_eq!(gen.call_count(), 1);
    }

    #[test]
    fn test_prompt_formats_confidence() {
        let pipeline = RecommendationPipeline::new(Arc::new(ScriptedGenerator::new()));
        let prompt = pipeline.build_prompt("fear", 0.876, "exam tomorrow");
        assert!(prompt.contains("- Confidence: 0.88\n"));
        assert!(prompt.contains("- User Text: \"exam tomorrow\""));
        assert!(prompt.contains("DO NOT include any movies"));
    }

    #[test]
    fn test_good_message_passes_through() {
        let gen = Arc::new(ScriptedGenerator::with_responses([Some(MESSAGE), Some("TOTAL_SCORE: 9")]));
        let pipeline = RecommendationPipeline::new(gen.clone());
        let out = pipeline.generate_detailed("sadness", 0.8, "").unwrap();

        assert_eq!(out.candidate.text, MESSAGE);
        assert_eq!(out.state, ReflectionState::Judged);
        assert!(gen.prompts()[1].contains("expert judge for empathetic support message quality"));
    }

    #[test]
    fn test_low_score_message_is_reflected() {
        let gen = Arc::new(ScriptedGenerator::with_responses([
            Some(MESSAGE),
            Some("TOTAL_SCORE: 4\nOVERALL_CRITIQUE: tips too long"),
            Some("Rewritten message"),
        ]));
        let pipeline = RecommendationPipeline::new(gen.clone()).with_threshold(7.0);
        let out = pipeline.generate_detailed("sadness", 0.8, "").unwrap();

        assert_eq!(out.candidate.text, "Rewritten message");
        assert_eq!(out.reason, ImproveReason::J003_BELOW_THRESHOLD);
        assert!(gen.prompts()[2].contains("- Overall: tips too long"));
    }
}
