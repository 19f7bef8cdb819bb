//! Judge: rubric scoring of one candidate by a second generation call

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::generator::TextGenerator;
use crate::core::response_parser::ResponseParser;
use crate::types::{Criterion, JudgeContext, Verdict};
use crate::{CRITERION_MAX_SCORE, TOTAL_MAX_SCORE};

/// Scores candidates against the four-criterion rubric
#[derive(Clone)]
pub struct Judge {
    generator: Arc<dyn TextGenerator>,
    parser: ResponseParser,
}

impl Judge {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            parser: ResponseParser::new(),
        }
    }

    /// Build the rubric prompt. The candidate is embedded verbatim between
    /// triple-quote fences.
    pub fn build_prompt(&self, candidate_text: &str, ctx: &JudgeContext) -> String {
        let threshold = ctx.score_threshold;
        let criteria: String = Criterion::ALL
            .iter()
            .map(|c| {
                format!(
                    "   - {}: {} (0-{})\n",
                    c,
                    c.rubric_question(&ctx.emotion),
                    CRITERION_MAX_SCORE
                )
            })
            .collect();
        let format_lines: String = Criterion::ALL
            .iter()
            .map(|c| format!("{}: <number>\n{}: <reason>\n", c.score_marker(), c.reason_marker()))
            .collect();

        format!(
            "You are an expert judge for {subject} quality. Context:\n\
             {context}\n\
             \n\
             Candidate:\n\
             \"\"\"{candidate}\"\"\"\n\
             \n\
             Instructions to the judge:\n\
             1. Evaluate the candidate ONLY on these 4 criteria (each worth {per} points, total {total}):\n\
             {criteria}\
             \n\
             2. For each criterion, provide a brief reason (1-2 sentences max).\n\
             \n\
             3. Give a total numerical score from 0-{total}.\n\
             \n\
             4. Provide an overall critique summarizing the main issues if the total is below {threshold}.\n\
             \n\
             Format EXACTLY as follows (no variations):\n\
             {format_lines}\
             TOTAL_SCORE: <number>\n\
             OVERALL_CRITIQUE: <critique if score < {threshold}, else \"Good\">\n",
            subject = ctx.subject,
            context = ctx.context_prompt,
            candidate = candidate_text,
            per = CRITERION_MAX_SCORE,
            total = TOTAL_MAX_SCORE,
            criteria = criteria,
            threshold = threshold,
            format_lines = format_lines,
        )
    }

    /// Judge one candidate. A failed call yields `Verdict::unavailable()`.
    pub fn judge(&self, candidate_text: &str, ctx: &JudgeContext) -> Verdict {
        let prompt = self.build_prompt(candidate_text, ctx);

        let Some(raw) = self.generator.generate(&prompt) else {
            warn!(emotion = %ctx.emotion, "judge unavailable, no verdict");
            return Verdict::unavailable();
        };
        info!(target: "vibecheck::judge", candidate = candidate_text, raw = %raw, "judge output");

        let verdict = self.parser.parse(&raw);
        debug!(
            target: "vibecheck::judge",
            candidate = candidate_text,
            "scoring breakdown\n{}",
            verdict.breakdown()
        );
        verdict
    }
}
