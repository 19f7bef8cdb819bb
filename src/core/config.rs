//! Generation settings, loaded from the environment and overridable per field

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::DEFAULT_GENERATION_TIMEOUT_SECS;

/// Default Gemini REST base
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Primary model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Tried in order when the primary model yields nothing
pub const DEFAULT_FALLBACK_MODELS: [&str; 1] = ["gemini-2.5-pro"];

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({expected})")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Settings for the text-generation collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub fallback_models: Vec<String>,
    /// Per-call timeout; a hung provider surfaces as "unavailable" after this
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            fallback_models: DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }
}

impl GenerationConfig {
    /// Read `GEMINI_API_BASE`, `GEMINI_API_KEY` (or `GOOGLE_API_KEY`),
    /// `GEMINI_MODEL` and `VIBECHECK_GENERATION_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, against an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(base) = non_empty("GEMINI_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        config.api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY"));
        if let Some(model) = non_empty("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(raw) = non_empty("VIBECHECK_GENERATION_TIMEOUT_SECS") {
            let secs = parse_timeout_secs(&raw).ok_or(ConfigError::InvalidValue {
                var: "VIBECHECK_GENERATION_TIMEOUT_SECS",
                value: raw.clone(),
                expected: "a positive whole number of seconds",
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Primary model followed by the fallbacks, without duplicates
    pub fn models(&self) -> Vec<&str> {
        let mut out: Vec<&str> = vec![self.model.as_str()];
        for m in &self.fallback_models {
            if !out.contains(&m.as_str()) {
                out.push(m.as_str());
            }
        }
        out
    }
}

fn parse_timeout_secs(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|secs| *secs > 0)
}
