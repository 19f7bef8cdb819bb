//! Terminal states of one judge/reflect step

use serde::{Deserialize, Serialize};

/// Where a candidate ended up after a single orchestrator step.
/// All three are terminal; there is no loop back to judging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReflectionState {
    /// Judged at or above threshold, text kept
    Judged,
    /// Judged below threshold and rewritten
    Reflected,
    /// No rewrite happened although one was not ruled out by the score
    Skipped,
}

impl ReflectionState {
    /// ANSI color for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            ReflectionState::Judged => "\x1b[32m",    // Green
            ReflectionState::Reflected => "\x1b[33m", // Yellow
            ReflectionState::Skipped => "\x1b[90m",   // Gray
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for ReflectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReflectionState::Judged => "JUDGED",
            ReflectionState::Reflected => "REFLECTED",
            ReflectionState::Skipped => "SKIPPED",
        };
        write!(f, "{}", name)
    }
}
