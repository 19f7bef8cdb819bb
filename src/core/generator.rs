//! Generation collaborator: single-shot text completion from a prompt
//!
//! The judge, the reflector and every pipeline talk to the model through
//! `TextGenerator`. A failed or empty call is `None`, never an error.

use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::blocking::Client as HttpClient;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::GenerationConfig;

/// Single-shot text completion with no conversation state
pub trait TextGenerator: Send + Sync {
    /// Trimmed, non-empty completion, or `None` when unavailable
    fn generate(&self, prompt: &str) -> Option<String>;
}

/// Why a generation call produced no text
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured (set GEMINI_API_KEY or GOOGLE_API_KEY)")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("response contained no text")]
    Empty,
}

/// Trim and drop blank completions
pub fn normalize_completion(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// GEMINI
// =============================================================================

/// Blocking client for the Gemini `generateContent` endpoint
#[derive(Debug)]
pub struct GeminiGenerator {
    config: GenerationConfig,
    http: HttpClient,
}

impl GeminiGenerator {
    /// Build a client; the configured timeout applies to every call
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerationError::Client)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.config.api_base, model_path)
    }

    /// Try the primary model, then each fallback, returning the first text
    pub fn try_generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let mut last_err = GenerationError::Empty;
        for model in self.config.models() {
            match self.call_model(model, api_key, prompt) {
                Ok(text) => return Ok(text),
                Err(err) => {
                    warn!(model, error = %err, "generation attempt failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }

    fn call_model(&self, model: &str, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let endpoint = self.endpoint_for_model(model);
        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .map_err(|source| GenerationError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate(&body, 300),
            });
        }

        let value: Value = response
            .json()
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        debug!(model, "generation response received");
        extract_text(&value).ok_or(GenerationError::Empty)
    }
}

impl TextGenerator for GeminiGenerator {
    fn generate(&self, prompt: &str) -> Option<String> {
        match self.try_generate(prompt) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(error = %err, "generation unavailable");
                None
            }
        }
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    normalize_completion(&text)
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(max_chars).collect();
        out.push_str("...");
        out
    }
}

// =============================================================================
// SCRIPTED
// =============================================================================

/// Deterministic generator: replays queued responses in order.
/// A queued `None`, or an exhausted queue, behaves like an outage.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Generator with nothing queued (every call unavailable)
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator preloaded with responses
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let generator = Self::new();
        for r in responses {
            generator.push_response(r.map(Into::into));
        }
        generator
    }

    pub fn push(&self, text: impl Into<String>) {
        self.push_response(Some(text.into()));
    }

    fn push_response(&self, response: Option<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Responses not consumed yet
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .flatten();
        next.as_deref().and_then(normalize_completion)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_in_order() {
        let gen = ScriptedGenerator::with_responses([Some("one"), None, Some("  three  ")]);
        assert_eq!(gen.generate("a").as_deref(), Some("one"));
        assert_eq!(gen.generate("b"), None);
        assert_eq!(gen.generate("c").as_deref(), Some("three"));
        assert_eq!(gen.generate("d"), None);
        assert_eq!(gen.prompts(), vec!["a", "b", "c", "d"]);
        assert_eq!(gen.remaining(), 0);
    }

    #[test]
    fn test_blank_completion_is_unavailable() {
        let gen = ScriptedGenerator::new();
        gen.push("   \n  ");
        assert_eq!(gen.generate("p"), None);
        assert_eq!(gen.call_count(), 1);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "there\n" }] }
            }]
        });
        assert_eq!(extract_text(&payload).as_deref(), Some("Hello there"));
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        assert_eq!(extract_text(&json!({ "promptFeedback": {} })), None);
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_endpoint_for_model() {
        let gen = GeminiGenerator::new(GenerationConfig::default()).unwrap();
        assert_eq!(
            gen.endpoint_for_model("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            gen.endpoint_for_model("models/gemini-2.5-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_missing_key_is_unavailable() {
        let gen = GeminiGenerator::new(GenerationConfig::default()).unwrap();
        assert!(matches!(gen.try_generate("hi"), Err(GenerationError::MissingApiKey)));
        assert_eq!(gen.generate("hi"), None);
    }
}
