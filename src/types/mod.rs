//! Core types for VibeCheck

mod verdict;
mod context;
mod candidate;
mod state;
mod reason;
mod output;
mod entertainment;

pub use verdict::{Criterion, CriterionResult, Verdict};
pub use context::JudgeContext;
pub use candidate::Candidate;
pub use state::ReflectionState;
pub use reason::ImproveReason;
pub use output::{GeneratorCheck, Improvement, MoodReport, RankedCaption};
pub use entertainment::{BookLink, EntertainmentRecommendations, MovieLink, MusicLink};
