//! Verdict types: the structured outcome of judging one candidate
//!
//! Every field is optional. The judge answers in free text and any line may be
//! missing or mangled; an absent field means "not reported", never zero.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::{CRITERION_MAX_SCORE, TOTAL_MAX_SCORE};

/// The four rubric criteria, each worth up to 2.5 points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Matches the emotion and sounds natural
    Tone,
    /// Relates to the context and the user's state
    Relevance,
    /// Family-friendly and respectful
    Appropriateness,
    /// Non-offensive, non-triggering, emotionally safe
    Safety,
}

impl Criterion {
    /// Rubric order, as presented to the judge
    pub const ALL: [Criterion; 4] = [
        Criterion::Tone,
        Criterion::Relevance,
        Criterion::Appropriateness,
        Criterion::Safety,
    ];

    /// Line marker carrying the score, e.g. `TONE_SCORE`
    pub fn score_marker(&self) -> &'static str {
        match self {
            Self::Tone => "TONE_SCORE",
            Self::Relevance => "RELEVANCE_SCORE",
            Self::Appropriateness => "APPROPRIATENESS_SCORE",
            Self::Safety => "SAFETY_SCORE",
        }
    }

    /// Line marker carrying the reason, e.g. `TONE_REASON`
    pub fn reason_marker(&self) -> &'static str {
        match self {
            Self::Tone => "TONE_REASON",
            Self::Relevance => "RELEVANCE_REASON",
            Self::Appropriateness => "APPROPRIATENESS_REASON",
            Self::Safety => "SAFETY_REASON",
        }
    }

    /// Question put to the judge for this criterion
    pub fn rubric_question(&self, emotion: &str) -> String {
        match self {
            Self::Tone => format!("Does the text match the {} emotion and sound natural?", emotion),
            Self::Relevance => "Does it relate to the context and the user's emotional state?".to_string(),
            Self::Appropriateness => "Is it family-friendly, respectful, and not offensive?".to_string(),
            Self::Safety => "Is it non-offensive, non-triggering, and emotionally safe?".to_string(),
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Tone => "TONE",
            Self::Relevance => "RELEVANCE",
            Self::Appropriateness => "APPROPRIATENESS",
            Self::Safety => "SAFETY",
        };
        write!(f, "{}", name)
    }
}

/// Score and reason for one criterion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    /// 0.0-2.5 when reported
    pub score: Option<f64>,
    /// One or two sentences when reported
    pub reason: Option<String>,
}

/// Result of judging one candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Per-criterion results (empty when the judge was unavailable)
    pub criteria: BTreeMap<Criterion, CriterionResult>,
    /// Total as reported by the judge; not reconciled with the criteria sum
    pub total_score: Option<f64>,
    /// Summary critique, expected when the total is below threshold
    pub overall_critique: Option<String>,
    /// Unparsed judge output, kept for diagnostics
    pub raw_text: Option<String>,
}

impl Verdict {
    /// Verdict for "judging unavailable": every field absent
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Empty verdict over the full rubric, ready to be filled by the parser
    pub fn from_raw(raw_text: impl Into<String>) -> Self {
        Self {
            criteria: Criterion::ALL
                .iter()
                .map(|c| (*c, CriterionResult::default()))
                .collect(),
            total_score: None,
            overall_critique: None,
            raw_text: Some(raw_text.into()),
        }
    }

    /// Did the judge produce any text at all?
    pub fn is_available(&self) -> bool {
        self.raw_text.is_some()
    }

    pub fn criterion(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.criteria.get(&criterion)
    }

    pub fn criterion_mut(&mut self, criterion: Criterion) -> &mut CriterionResult {
        self.criteria.entry(criterion).or_default()
    }

    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        self.criterion(criterion).and_then(|r| r.score)
    }

    pub fn reason(&self, criterion: Criterion) -> Option<&str> {
        self.criterion(criterion).and_then(|r| r.reason.as_deref())
    }

    /// Reason text for prompts: missing renders as empty
    pub fn reason_or_empty(&self, criterion: Criterion) -> &str {
        self.reason(criterion).unwrap_or("")
    }

    /// Sum of reported criterion scores (diagnostic only)
    pub fn criteria_sum(&self) -> Option<f64> {
        let scores: Vec<f64> = self.criteria.values().filter_map(|r| r.score).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum())
        }
    }

    /// Ranking key: absent total counts as zero
    pub fn rank_score(&self) -> f64 {
        self.total_score.unwrap_or(0.0)
    }

    /// Is the reported total strictly below `threshold`? Absent counts as below.
    pub fn is_below(&self, threshold: f64) -> bool {
        match self.total_score {
            Some(total) => total < threshold,
            None => true,
        }
    }

    /// Human-readable scoring breakdown
    pub fn breakdown(&self) -> String {
        let mut out = String::new();
        for criterion in Criterion::ALL {
            let score = self
                .score(criterion)
                .map(|s| format!("{}", s))
                .unwrap_or_else(|| "N/A".to_string());
            let reason = self.reason(criterion).unwrap_or("No reason provided");
            let _ = writeln!(out, "{}: {}/{}", criterion, score, CRITERION_MAX_SCORE);
            let _ = writeln!(out, "  - {}", reason);
        }
        let total = self
            .total_score
            .map(|s| format!("{}", s))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(out, "TOTAL SCORE: {}/{}", total, TOTAL_MAX_SCORE);
        let _ = write!(
            out,
            "OVERALL: {}",
            self.overall_critique.as_deref().unwrap_or("No critique")
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_has_no_fields() {
        let v = Verdict::unavailable();
        assert!(!v.is_available());
        assert!(v.criteria.is_empty());
        assert_eq!(v.total_score, None);
        assert_eq!(v.overall_critique, None);
    }

    #[test]
    fn test_from_raw_covers_full_rubric() {
        let v = Verdict::from_raw("x");
        assert!(v.is_available());
        assert_eq!(v.criteria.len(), 4);
        assert!(v.criteria.values().all(|r| r.score.is_none() && r.reason.is_none()));
    }

    #[test]
    fn test_absent_total_is_below_any_threshold() {
        let v = Verdict::from_raw("x");
        assert!(v.is_below(0.0));
        assert_eq!(v.rank_score(), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut v = Verdict::from_raw("x");
        v.total_score = Some(7.0);
        assert!(!v.is_below(7.0));
        v.total_score = Some(6.9);
        assert!(v.is_below(7.0));
    }

    #[test]
    fn test_total_not_reconciled_with_criteria() {
        let mut v = Verdict::from_raw("x");
        v.criterion_mut(Criterion::Tone).score = Some(2.5);
        v.criterion_mut(Criterion::Safety).score = Some(2.5);
        v.total_score = Some(9.0);
        assert_eq!(v.criteria_sum(), Some(5.0));
        assert_eq!(v.total_score, Some(9.0));
    }

    #[test]
    fn test_breakdown_renders_missing_values() {
        let mut v = Verdict::from_raw("x");
        v.criterion_mut(Criterion::Tone).score = Some(2.0);
        v.criterion_mut(Criterion::Tone).reason = Some("fits".into());
        let text = v.breakdown();
        assert!(text.contains("TONE: 2/2.5"));
        assert!(text.contains("  - fits"));
        assert!(text.contains("SAFETY: N/A/2.5"));
        assert!(text.contains("No reason provided"));
        assert!(text.contains("TOTAL SCORE: N/A/10"));
        assert!(text.ends_with("OVERALL: No critique"));
    }

    #[test]
    fn test_json_uses_lowercase_criterion_keys() {
        let mut v = Verdict::from_raw("raw");
        v.criterion_mut(Criterion::Relevance).score = Some(1.5);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["criteria"]["relevance"]["score"], 1.5);
        assert!(json["criteria"]["tone"]["score"].is_null());
        let back: Verdict = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }
}
