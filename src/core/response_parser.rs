//! Response parser: judge text → `Verdict`
//!
//! Line-oriented and tolerant. The judge is asked for an exact
//! `FIELD: value` layout but nothing here relies on it beyond the colon: a line
//! is matched by the key in front of its first colon, unknown lines are
//! ignored, and a field that cannot be read stays absent. Parsing never fails.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{Criterion, Verdict};

lazy_static! {
    /// First integer or decimal numeral, e.g. "2" in "2/2.5 (decent)"
    static ref RE_NUMERAL: Regex = Regex::new(r"\d+\.?\d*").unwrap();

    /// Leading list numbering or bullet: "1. ", "2) ", "- ", "* ", "• "
    static ref RE_LIST_MARKER: Regex = Regex::new(r"^(?:\d+[.)]\s+|[-*•]\s+)").unwrap();

    /// Leading word of a field key once spaces are folded to underscores
    static ref RE_FIELD_KEY: Regex = Regex::new(r"^[A-Z_]+").unwrap();
}

pub const TOTAL_SCORE_MARKER: &str = "TOTAL_SCORE";
pub const OVERALL_CRITIQUE_MARKER: &str = "OVERALL_CRITIQUE";

/// Which verdict field a line carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeField {
    Score(Criterion),
    Reason(Criterion),
    Total,
    Critique,
}

/// Tolerant parser for judge output
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseParser;

impl ResponseParser {
    /// Create new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse raw judge text. Later lines overwrite earlier ones for the same field.
    pub fn parse(&self, raw: &str) -> Verdict {
        let mut verdict = Verdict::from_raw(raw);

        for line in raw.lines() {
            let Some(field) = classify_line(line) else {
                continue;
            };
            match field {
                JudgeField::Score(c) => verdict.criterion_mut(c).score = extract_score(line),
                JudgeField::Reason(c) => verdict.criterion_mut(c).reason = Some(extract_reason(line)),
                JudgeField::Total => verdict.total_score = extract_score(line),
                JudgeField::Critique => verdict.overall_critique = Some(extract_reason(line)),
            }
        }

        verdict
    }

    /// Render a verdict in the canonical line-per-field layout the judge is asked for
    pub fn render(&self, verdict: &Verdict) -> String {
        let mut lines = Vec::with_capacity(10);
        for c in Criterion::ALL {
            lines.push(format!("{}: {}", c.score_marker(), render_number(verdict.score(c))));
            lines.push(format!("{}: {}", c.reason_marker(), verdict.reason_or_empty(c)));
        }
        lines.push(format!("{}: {}", TOTAL_SCORE_MARKER, render_number(verdict.total_score)));
        lines.push(format!(
            "{}: {}",
            OVERALL_CRITIQUE_MARKER,
            verdict.overall_critique.as_deref().unwrap_or("")
        ));
        lines.join("\n")
    }
}

/// Decide which field a line belongs to, if any.
///
/// Only the key in front of the first colon is looked at, so a reason that
/// mentions another field's marker keeps its own field.
pub fn classify_line(line: &str) -> Option<JudgeField> {
    let key = field_key(line);

    if key == TOTAL_SCORE_MARKER {
        return Some(JudgeField::Total);
    }
    if key == OVERALL_CRITIQUE_MARKER {
        return Some(JudgeField::Critique);
    }
    Criterion::ALL.into_iter().find_map(|c| {
        if key == c.score_marker() {
            Some(JudgeField::Score(c))
        } else if key == c.reason_marker() {
            Some(JudgeField::Reason(c))
        } else {
            None
        }
    })
}

/// Normalized key of a line: "**Tone Score (0-2.5):**" → "TONE_SCORE"
fn field_key(line: &str) -> String {
    let head = line.split_once(':').map_or(line, |(head, _)| head);
    let head = strip_list_marker(head).trim_matches(|ch: char| ch == '*' || ch == '#' || ch.is_whitespace());
    let folded = head.to_uppercase().replace(' ', "_");
    RE_FIELD_KEY
        .find(&folded)
        .map(|m| m.as_str().trim_end_matches('_').to_string())
        .unwrap_or_default()
}

/// First numeral after the first colon. No colon or no numeral → `None`.
pub fn extract_score(line: &str) -> Option<f64> {
    let (_, value) = line.split_once(':')?;
    let numeral = RE_NUMERAL.find(value)?;
    numeral.as_str().trim_end_matches('.').parse::<f64>().ok()
}

/// Text after the first colon, trimmed (markdown emphasis included).
/// Empty when nothing follows or there is no colon.
pub fn extract_reason(line: &str) -> String {
    match line.split_once(':') {
        Some((_, value)) => value.trim().trim_matches('*').trim().to_string(),
        None => String::new(),
    }
}

/// Remove a leading list number or bullet from a generated line
pub fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim();
    match RE_LIST_MARKER.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim(),
        None => trimmed,
    }
}

fn render_number(value: Option<f64>) -> String {
    value.map(|v| format!("{}", v)).unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================
