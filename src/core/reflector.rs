//! Reflector: one corrective rewrite seeded with the judge's feedback

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::generator::TextGenerator;
use crate::types::{Criterion, JudgeContext, Verdict};

/// Rewrites a below-threshold candidate
#[derive(Clone)]
pub struct Reflector {
    generator: Arc<dyn TextGenerator>,
}

impl Reflector {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Build the rewrite prompt. Missing reasons render as empty text.
    pub fn build_prompt(&self, candidate_text: &str, ctx: &JudgeContext, verdict: &Verdict) -> String {
        let feedback: String = Criterion::ALL
            .iter()
            .map(|c| format!("- {} Issue: {}\n", c, verdict.reason_or_empty(*c)))
            .collect();
        let overall = match verdict.overall_critique.as_deref() {
            Some(critique) if !critique.is_empty() => format!("- Overall: {}\n", critique),
            _ => String::new(),
        };

        format!(
            "Context: {context}\n\
             Emotion: {emotion}\n\
             \n\
             Original {subject}:\n\
             \"\"\"{candidate}\"\"\"\n\
             \n\
             Judge's detailed feedback:\n\
             {feedback}{overall}\
             \n\
             Reflection instructions:\n\
             {instructions}\n\
             \n\
             {directive}\n",
            context = ctx.context_prompt,
            emotion = ctx.emotion,
            subject = ctx.subject,
            candidate = candidate_text,
            feedback = feedback,
            overall = overall,
            instructions = ctx.critique_instructions,
            directive = ctx.rewrite_directive,
        )
    }

    /// Rewrite the candidate; `None` when the generation call fails
    pub fn reflect(&self, candidate_text: &str, ctx: &JudgeContext, verdict: &Verdict) -> Option<String> {
        let prompt = self.build_prompt(candidate_text, ctx, verdict);
        match self.generator.generate(&prompt) {
            Some(rewritten) => {
                info!(target: "vibecheck::reflect", original = candidate_text, rewritten = %rewritten, "reflection applied");
                Some(rewritten)
            }
            None => {
                warn!(target: "vibecheck::reflect", original = candidate_text, "reflection unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::ScriptedGenerator;

    fn verdict_with_reasons() -> Verdict {
        let mut v = Verdict::from_raw("raw");
        v.criterion_mut(Criterion::Tone).reason = Some("too gloomy".into());
        v.criterion_mut(Criterion::Safety).reason = Some("mentions self-harm".into());
        v.total_score = Some(4.0);
        v.overall_critique = Some("lighten it up".into());
        v
    }

    #[test]
    fn test_prompt_carries_feedback() {
        let reflector = Reflector::new(Arc::new(ScriptedGenerator::new()));
        let ctx = JudgeContext::caption("sadness");
        let prompt = reflector.build_prompt("Sab khatam", &ctx, &verdict_with_reasons());

        assert!(prompt.contains("Emotion: sadness"));
        assert!(prompt.contains("\"\"\"Sab khatam\"\"\""));
        assert!(prompt.contains("- TONE Issue: too gloomy\n"));
        assert!(prompt.contains("- SAFETY Issue: mentions self-harm\n"));
        assert!(prompt.contains("- Overall: lighten it up\n"));
        assert!(prompt.contains(&ctx.critique_instructions));
        assert!(prompt.contains("max 10 words"));
    }

    #[test]
    fn test_missing_reasons_render_empty() {
        let reflector = Reflector::new(Arc::new(ScriptedGenerator::new()));
        let prompt = reflector.build_prompt("x", &JudgeContext::caption("joy"), &Verdict::unavailable());
        assert!(prompt.contains("- RELEVANCE Issue: \n"));
        assert!(!prompt.contains("- Overall:"));
    }

    #[test]
    fn test_reflect_returns_trimmed_rewrite() {
        let gen = Arc::new(ScriptedGenerator::with_responses([Some("  Gham ko bolo bye bye \n")]));
        let reflector = Reflector::new(gen);
        let out = reflector.reflect("x", &JudgeContext::caption("sadness"), &verdict_with_reasons());
        assert_eq!(out.as_deref(), Some("Gham ko bolo bye bye"));
    }

    #[test]
    fn test_reflect_failure_is_none() {
        let reflector = Reflector::new(Arc::new(ScriptedGenerator::new()));
        assert_eq!(reflector.reflect("x", &JudgeContext::caption("joy"), &verdict_with_reasons()), None);
    }
}
