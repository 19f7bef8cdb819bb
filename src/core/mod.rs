//! Core modules for VibeCheck

pub mod config;
pub mod generator;
pub mod response_parser;
pub mod judge;
pub mod reflector;
pub mod orchestrator;
pub mod caption_pipeline;
pub mod recommendation_pipeline;
pub mod entertainment;
pub mod engine;
pub mod api;

pub use config::{ConfigError, GenerationConfig};
pub use generator::{GeminiGenerator, GenerationError, ScriptedGenerator, TextGenerator};
pub use response_parser::ResponseParser;
pub use judge::Judge;
pub use reflector::Reflector;
pub use orchestrator::JudgeReflectOrchestrator;
pub use caption_pipeline::CaptionPipeline;
pub use recommendation_pipeline::{fallback_message, RecommendationPipeline};
pub use entertainment::{parse_recommendations, EntertainmentPipeline};
pub use engine::{EngineSettings, VibeEngine};
pub use api::{create_router, run_server};
