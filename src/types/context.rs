//! Per-call judging context

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_SCORE_THRESHOLD, REFLECTION_WORD_LIMIT};

/// Immutable bundle handed to the judge and the reflector.
/// Neither of them mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeContext {
    /// Detected emotion label, e.g. "sadness"
    pub emotion: String,
    /// What the candidate is supposed to be
    pub context_prompt: String,
    /// Rewrite guidance for the reflector
    pub critique_instructions: String,
    /// Totals strictly below this trigger reflection
    pub score_threshold: f64,
    /// Kind of text being judged, used in the judge persona
    pub subject: String,
    /// Closing line of the rewrite prompt (length and format bound)
    pub rewrite_directive: String,
}

impl JudgeContext {
    /// Generic context with the default threshold
    pub fn new(
        emotion: impl Into<String>,
        context_prompt: impl Into<String>,
        critique_instructions: impl Into<String>,
    ) -> Self {
        Self {
            emotion: emotion.into(),
            context_prompt: context_prompt.into(),
            critique_instructions: critique_instructions.into(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            subject: "generated text".to_string(),
            rewrite_directive: "Rewrite and improve the text addressing EACH issue above. \
                                Keep it concise and in the same format as the original."
                .to_string(),
        }
    }

    /// Context for judging Roman Urdu meme captions
    pub fn caption(emotion: &str) -> Self {
        Self {
            subject: "meme caption".to_string(),
            rewrite_directive: format!(
                "Rewrite and improve the caption addressing EACH issue above. \
                 Keep the result short (max {} words) and directly usable as a meme caption.",
                REFLECTION_WORD_LIMIT
            ),
            ..Self::new(
                emotion,
                format!(
                    "Create funny Roman Urdu meme captions for emotion '{}'. \
                     Keep them witty, short, and natural-sounding.",
                    emotion
                ),
                format!(
                    "Rewrite the caption to be wittier and more natural-sounding Roman Urdu while preserving brevity. \
                     Ensure the TONE matches the {} emotion, it is RELEVANT to the context, \
                     APPROPRIATE for all ages, and SAFE for someone in that mood. \
                     Keep it to <={} words if possible.",
                    emotion, REFLECTION_WORD_LIMIT
                ),
            )
        }
    }

    /// Lighter caption context used by the judging diagnostics
    pub fn caption_debug(emotion: &str) -> Self {
        Self {
            context_prompt: format!("Create funny Roman Urdu meme captions for emotion '{}'.", emotion),
            critique_instructions: "Improve the caption to be wittier and more natural.".to_string(),
            ..Self::caption(emotion)
        }
    }

    /// Context for judging an empathetic support message
    pub fn recommendation(emotion: &str) -> Self {
        Self {
            subject: "empathetic support message".to_string(),
            rewrite_directive: "Rewrite and improve the message addressing EACH issue above. \
                                Keep the same layout: one acknowledgement line, four short tips \
                                on their own lines, one blank line, one closing line."
                .to_string(),
            ..Self::new(
                emotion,
                "Produce a short empathetic support message with: acknowledgment, \
                 4 short tips, one blank line, closing line. NO movies/books/music recommendations.",
                "Using the critique, rewrite the message to strictly satisfy: exactly 4 self-care tips of 7-8 words each, \
                 include one acknowledgement line with an emoji, keep tone gentle and concise. \
                 Make sure NO entertainment recommendations are included. \
                 Fix formatting and make it visually soothing; do not add long explanations.",
            )
        }
    }

    /// Override the reflection threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }
}
