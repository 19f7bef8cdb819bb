//! Caption pipeline: generate, filter, judge, rank
//!
//! Candidates are judged one at a time in generation order. Ranking is a
//! stable descending sort on total score (absent = 0), so equal scores keep
//! their first-seen order. The result never holds fewer than
//! `CAPTIONS_RETURNED` captions.

use std::sync::Arc;

use tracing::debug;

use crate::core::generator::TextGenerator;
use crate::core::orchestrator::JudgeReflectOrchestrator;
use crate::core::response_parser::strip_list_marker;
use crate::types::{JudgeContext, RankedCaption, Verdict};
use crate::{
    CAPTIONS_RETURNED, CAPTION_WORD_CAP, DEFAULT_SCORE_THRESHOLD, FALLBACK_CAPTIONS, MAX_CAPTION_CANDIDATES,
    PADDING_CAPTIONS, REFLECTION_WORD_LIMIT,
};

/// Roman Urdu meme caption generator with judge/reflect ranking
#[derive(Clone)]
pub struct CaptionPipeline {
    generator: Arc<dyn TextGenerator>,
    orchestrator: JudgeReflectOrchestrator,
    score_threshold: f64,
}

impl CaptionPipeline {
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

    /// Prompt asking for four short caption candidates, one per line
    pub fn build_prompt(&self, emotion: &str, user_text: &str) -> String {
        format!(
            "Generate {count} short, humorous and funny Roman Urdu captions that fit this mood.\n\
             - Keep each caption to one short sentence or phrase (<={words} words).\n\
             - Do NOT include hashtags, emojis, or extra commentary.\n\
             - Use simple, easy words and witty humor appropriate for light-hearted memes.\n\
             - Each caption should sound natural and conversational.\n\
             - Label each caption on its own line (no numbering required).\n\
             Context: emotion = {emotion}; user_text = \"{user_text}\"\n",
            count = MAX_CAPTION_CANDIDATES,
            words = REFLECTION_WORD_LIMIT,
            emotion = emotion,
            user_text = user_text,
        )
    }

    /// Judging context for one batch; the user's text is part of the relevance check
    pub fn context(&self, emotion: &str, user_text: &str) -> JudgeContext {
        let mut ctx = JudgeContext::caption(emotion).with_threshold(self.score_threshold);
        let user_text = user_text.trim();
        if !user_text.is_empty() {
            ctx.context_prompt = format!("{} The user wrote: \"{}\"", ctx.context_prompt, user_text);
        }
        ctx
    }

    /// Generate candidates and return the top captions, texts only
    pub fn generate(&self, emotion: &str, user_text: &str) -> Vec<String> {
        self.generate_ranked(emotion, user_text)
            .into_iter()
            .map(|r| r.caption)
            .collect()
    }

    /// Generate candidates and return the top captions with their verdicts.
    /// A failed generation call returns the canned pair unjudged.
    pub fn generate_ranked(&self, emotion: &str, user_text: &str) -> Vec<RankedCaption> {
        let Some(raw) = self.generator.generate(&self.build_prompt(emotion, user_text)) else {
            debug!(emotion, "caption generation unavailable, using fallback captions");
            return fallback_ranked();
        };
        debug!(emotion, raw = %raw, "raw caption candidates");

        let candidates = split_candidates(&raw);
        debug!(emotion, ?candidates, "filtered caption candidates");

        self.score_caption_batch(&candidates, emotion, user_text)
    }

    /// Judge up to four candidates in order and return the top two distinct texts
    pub fn score_caption_batch(&self, candidates: &[String], emotion: &str, user_text: &str) -> Vec<RankedCaption> {
        let ctx = self.context(emotion, user_text);

        let mut judged: Vec<RankedCaption> = candidates
            .iter()
            .take(MAX_CAPTION_CANDIDATES)
            .map(|text| {
                let (caption, verdict) = self.orchestrator.judge_and_improve(text, &ctx);
                RankedCaption { caption, verdict }
            })
            .collect();

        // Vec::sort_by is stable
        judged.sort_by(|a, b| b.verdict.rank_score().total_cmp(&a.verdict.rank_score()));

        let mut top: Vec<RankedCaption> = Vec::with_capacity(CAPTIONS_RETURNED);
        for entry in judged {
            if top.len() == CAPTIONS_RETURNED {
                break;
            }
            if !top.iter().any(|t| t.caption == entry.caption) {
                top.push(entry);
            }
        }

        for fallback in FALLBACK_CAPTIONS {
            if top.len() >= CAPTIONS_RETURNED {
                break;
            }
            if !top.iter().any(|t| t.caption == fallback) {
                top.push(RankedCaption {
                    caption: fallback.to_string(),
                    verdict: Verdict::unavailable(),
                });
            }
        }

        debug!(
            emotion,
            ranked = ?top.iter().map(|r| (r.caption.as_str(), r.verdict.total_score)).collect::<Vec<_>>(),
            "selected captions"
        );
        top
    }
}

/// Split generated text into caption candidates.
///
/// Numbering and bullets are stripped, blank lines skipped, and lines over
/// the word cap dropped. Fewer than two survivors are padded with stock
/// captions; at most four are kept.
pub fn split_candidates(raw: &str) -> Vec<String> {
    let mut candidates: Vec<String> = raw
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .filter(|line| line.split_whitespace().count() <= CAPTION_WORD_CAP)
        .map(str::to_string)
        .collect();

    if candidates.len() < CAPTIONS_RETURNED {
        candidates.extend(PADDING_CAPTIONS.iter().map(|s| s.to_string()));
        candidates.truncate(MAX_CAPTION_CANDIDATES);
    }
    candidates
}

fn fallback_ranked() -> Vec<RankedCaption> {
    FALLBACK_CAPTIONS
        .iter()
        .map(|c| RankedCaption {
            caption: c.to_string(),
            verdict: Verdict::unavailable(),
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::ScriptedGenerator;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_strips_markers_and_filters_long_lines() {
        let raw = "1. Chai pe charcha\n\n- Mood off, chai on\n\
                   this one is far too long to ever be used as a caption on a meme really\n\
                   • Dil garden garden";
        assert_eq!(
            split_candidates(raw),
            vec!["Chai pe charcha", "Mood off, chai on", "Dil garden garden"]
        );
    }

    #[test]
    fn test_split_pads_short_results() {
        assert_eq!(
            split_candidates("Bas kar do yaar"),
            vec!["Bas kar do yaar", "Smile kar lo zara", "Zindagi aik meme hai"]
        );
        assert_eq!(split_candidates("\n\n"), vec!["Smile kar lo zara", "Zindagi aik meme hai"]);
    }

    #[test]
    fn test_split_keeps_captions_that_start_with_numbers() {
        assert_eq!(
            split_candidates("2-minute noodles wali zindagi\n5:00 baj gaye, neend kahan"),
            vec!["2-minute noodles wali zindagi", "5:00 baj gaye, neend kahan"]
        );
    }

    #[test]
    fn test_split_keeps_twelve_word_lines() {
        let twelve = "one two three four five six seven eight nine ten eleven twelve";
        let thirteen = format!("{} thirteen", twelve);
        let out = split_candidates(&format!("{}\n{}\nshort one", twelve, thirteen));
        assert_eq!(out, vec![twelve.to_string(), "short one".to_string()]);
    }

    #[test]
    fn test_generation_failure_returns_canned_pair_unjudged() {
        let gen = Arc::new(ScriptedGenerator::new());
        let pipeline = CaptionPipeline::new(gen.clone());
        let out = pipeline.generate("sadness", "bad day");
        assert_eq!(out, FALLBACK_CAPTIONS.to_vec());
        assert_eq!(gen.call_count(), 1);
    }

    #[test]
    fn test_user_text_in_context() {
        let pipeline = CaptionPipeline::new(Arc::new(ScriptedGenerator::new()));
        let ctx = pipeline.context("joy", "  got promoted ");
        assert!(ctx.context_prompt.ends_with("The user wrote: \"got promoted\""));
        assert_eq!(pipeline.context("joy", "   ").context_prompt, JudgeContext::caption("joy").context_prompt);
    }

    #[test]
    fn test_prompt_mentions_emotion_and_text() {
        let pipeline = CaptionPipeline::new(Arc::new(ScriptedGenerator::new()));
        let prompt = pipeline.build_prompt("anger", "traffic again");
        assert!(prompt.starts_with("Generate 4 short"));
        assert!(prompt.contains("emotion = anger; user_text = \"traffic again\""));
    }

    #[test]
    fn test_empty_batch_falls_back() {
        let pipeline = CaptionPipeline::new(Arc::new(ScriptedGenerator::new()));
        let out = pipeline.score_caption_batch(&[], "joy", "");
        assert_eq!(out, fallback_ranked());
    }
}
