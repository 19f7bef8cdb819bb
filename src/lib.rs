//! VibeCheck: mood-driven captions and care messages
//!
//! Every generated text passes through a judge (rubric scoring by a second
//! generation call) and, when it scores low, a single reflection rewrite.

pub mod core;
pub mod types;

// =============================================================================
// RUBRIC
// =============================================================================

/// Score at or above which a candidate is kept as-is
pub const DEFAULT_SCORE_THRESHOLD: f64 = 7.0;

/// Points available per criterion (four criteria)
pub const CRITERION_MAX_SCORE: f64 = 2.5;

/// Points available in total
pub const TOTAL_MAX_SCORE: f64 = 10.0;

/// Reflection passes per candidate. The rewrite is never re-judged.
pub const MAX_REFLECTION_ROUNDS: u32 = 1;

// =============================================================================
// CAPTIONS
// =============================================================================

/// Candidates requested from the generator and judged per request
pub const MAX_CAPTION_CANDIDATES: usize = 4;

/// Candidates longer than this (in words) are dropped before judging
pub const CAPTION_WORD_CAP: usize = 12;

/// Captions returned to the caller
pub const CAPTIONS_RETURNED: usize = 2;

/// Word bound asked of the reflector when rewriting a caption
pub const REFLECTION_WORD_LIMIT: usize = 10;

/// Canned captions used when generation yields nothing usable
pub const FALLBACK_CAPTIONS: [&str; 2] = ["Smile kar lo zara", "Zindagi aik meme hai, enjoy kar lo"];

/// Padding used when filtering leaves fewer than two candidates
pub const PADDING_CAPTIONS: [&str; 2] = ["Smile kar lo zara", "Zindagi aik meme hai"];

// =============================================================================
// GENERATION
// =============================================================================

/// Per-call timeout for the generation collaborator (seconds)
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
