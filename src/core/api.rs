//! HTTP API for VibeCheck
//!
//! Endpoints:
//! - GET  /api/health            - Health check
//! - POST /api/captions          - Generate, judge and rank captions
//! - POST /api/captions/score    - Judge and rank caller-supplied captions
//! - POST /api/recommendations   - Empathetic support message
//! - POST /api/entertainment     - Movies, music and books with links
//! - POST /api/debug-judging     - Judge one caption and show the breakdown
//! - POST /api/analyze           - Message, entertainment and captions in one call
//! - GET  /api/test-generator    - One raw call to the text generator
//!
//! Pipeline work is blocking and runs on the blocking thread pool.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::core::engine::VibeEngine;
use crate::core::engine::EngineSettings;
use crate::types::{Criterion, CriterionResult, EntertainmentRecommendations, MoodReport, RankedCaption};

/// Emotion used by the judging diagnostics when none is given
pub const DEFAULT_DEBUG_EMOTION: &str = "happy";

/// App state
pub struct AppState {
    pub engine: Arc<VibeEngine>,
}

/// Error returned to HTTP clients as `{ "error": ... }`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Caption generation request
#[derive(Debug, Deserialize)]
pub struct CaptionRequest {
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub text: String,
}

/// Caption ranking request
#[derive(Debug, Deserialize)]
pub struct ScoreCaptionsRequest {
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub candidates: Vec<String>,
}

/// Captions response
#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub emotion: String,
    pub captions: Vec<RankedCaption>,
}

/// Recommendation and entertainment request
#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub text: String,
}

/// Recommendation response
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub emotion: String,
    pub message: String,
}

/// Entertainment response
#[derive(Debug, Serialize)]
pub struct EntertainmentResponse {
    pub emotion: String,
    #[serde(flatten)]
    pub recommendations: EntertainmentRecommendations,
}

/// Judging diagnostics request
#[derive(Debug, Deserialize)]
pub struct DebugJudgingRequest {
    #[serde(default)]
    pub caption: String,
    pub emotion: Option<String>,
}

/// Per-criterion breakdown, canonical four criteria only
#[derive(Debug, Serialize)]
pub struct JudgeBreakdown {
    pub tone: CriterionResult,
    pub relevance: CriterionResult,
    pub appropriateness: CriterionResult,
    pub safety: CriterionResult,
    pub total_score: Option<f64>,
    pub overall_critique: Option<String>,
}

/// Judging diagnostics response
#[derive(Debug, Serialize)]
pub struct DebugJudgingResponse {
    pub success: bool,
    pub original_caption: String,
    pub emotion: String,
    pub improved_caption: String,
    pub state: String,
    pub reason: String,
    pub judge_breakdown: JudgeBreakdown,
}

/// Generator check response; `reply` is null when the call failed
#[derive(Debug, Serialize)]
pub struct GeneratorCheckResponse {
    pub status: String,
    pub reply: Option<String>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub settings: EngineSettings,
}

/// Create the API router
pub fn create_router(engine: Arc<VibeEngine>) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        .route("/api/health", get(health))
        .route("/api/captions", post(generate_captions))
        .route("/api/captions/score", post(score_captions))
        .route("/api/recommendations", post(recommendations))
        .route("/api/entertainment", post(entertainment))
        .route("/api/debug-judging", post(debug_judging))
        .route("/api/analyze", post(analyze))
        .route("/api/test-generator", get(generator_check))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        settings: state.engine.settings(),
    })
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoodRequest>,
) -> Result<Json<MoodReport>, ApiError> {
    let emotion = require("emotion", &req.emotion)?;
    let text = require("text", &req.text)?;

    let engine = Arc::clone(&state.engine);
    let confidence = req.confidence;
    let report = run_blocking(move || engine.analyze_complete(&emotion, confidence, &text)).await?;
    Ok(Json(report))
}

async fn generator_check(State(state): State<Arc<AppState>>) -> Result<Json<GeneratorCheckResponse>, ApiError> {
    let engine = Arc::clone(&state.engine);
    let check = run_blocking(move || engine.check_generator()).await?;
    let status = if check.ok { "ok" } else { "unavailable" };
    Ok(Json(GeneratorCheckResponse {
        status: status.to_string(),
        reply: check.reply,
    }))
}

async fn generate_captions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CaptionRequest>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let emotion = require("emotion", &req.emotion)?;
    let text = require("text", &req.text)?;

    let engine = Arc::clone(&state.engine);
    let captions = {
        let emotion = emotion.clone();
        run_blocking(move || engine.generate_captions(&emotion, &text)).await?
    };
    Ok(Json(CaptionResponse { emotion, captions }))
}

async fn score_captions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScoreCaptionsRequest>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let emotion = require("emotion", &req.emotion)?;
    let candidates: Vec<String> = req
        .candidates
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if candidates.is_empty() {
        return Err(ApiError::BadRequest("No candidates provided".to_string()));
    }

    let engine = Arc::clone(&state.engine);
    let text = req.text;
    let captions = {
        let emotion = emotion.clone();
        run_blocking(move || engine.score_caption_batch(&candidates, &emotion, &text)).await?
    };
    Ok(Json(CaptionResponse { emotion, captions }))
}

async fn recommendations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoodRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let emotion = require("emotion", &req.emotion)?;
    let text = require("text", &req.text)?;

    let engine = Arc::clone(&state.engine);
    let confidence = req.confidence;
    let message = {
        let emotion = emotion.clone();
        run_blocking(move || engine.generate_recommendation_text(&emotion, confidence, &text)).await?
    };
    Ok(Json(RecommendationResponse { emotion, message }))
}

async fn entertainment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoodRequest>,
) -> Result<Json<EntertainmentResponse>, ApiError> {
    let emotion = require("emotion", &req.emotion)?;
    let text = require("text", &req.text)?;

    let engine = Arc::clone(&state.engine);
    let confidence = req.confidence;
    let recommendations = {
        let emotion = emotion.clone();
        run_blocking(move || engine.recommend_entertainment(&emotion, confidence, &text)).await?
    };
    Ok(Json(EntertainmentResponse {
        emotion,
        recommendations,
    }))
}

async fn debug_judging(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DebugJudgingRequest>,
) -> Result<Json<DebugJudgingResponse>, ApiError> {
    let caption = req.caption.trim().to_string();
    if caption.is_empty() {
        return Err(ApiError::BadRequest("No caption provided".to_string()));
    }
    let emotion = req
        .emotion
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_DEBUG_EMOTION.to_string());

    let engine = Arc::clone(&state.engine);
    let outcome = {
        let (caption, emotion) = (caption.clone(), emotion.clone());
        run_blocking(move || engine.judge_single_detailed(&caption, &emotion)).await?
    };

    let verdict = &outcome.candidate.verdict;
    let criterion = |c: Criterion| verdict.criterion(c).cloned().unwrap_or_default();
    let judge_breakdown = JudgeBreakdown {
        tone: criterion(Criterion::Tone),
        relevance: criterion(Criterion::Relevance),
        appropriateness: criterion(Criterion::Appropriateness),
        safety: criterion(Criterion::Safety),
        total_score: verdict.total_score,
        overall_critique: verdict.overall_critique.clone(),
    };

    Ok(Json(DebugJudgingResponse {
        success: true,
        original_caption: caption,
        emotion,
        improved_caption: outcome.candidate.text.clone(),
        state: outcome.state.to_string(),
        reason: outcome.reason.code().to_string(),
        judge_breakdown,
    }))
}

/// Trimmed field value, or 400 when blank
fn require(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::BadRequest(format!("Missing required field: {}", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Run pipeline work off the async workers
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "pipeline task failed");
        ApiError::Internal("Internal error while processing the request".to_string())
    })
}

/// Run the API server
pub async fn run_server(addr: &str, engine: Arc<VibeEngine>) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(engine);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("🌈 VibeCheck API running on {}", addr);
    println!("  GET  /api/health           - Health check");
    println!("  POST /api/captions         - Generate ranked captions");
    println!("  POST /api/captions/score   - Rank supplied captions");
    println!("  POST /api/recommendations  - Support message");
    println!("  POST /api/entertainment    - Movies, music, books");
    println!("  POST /api/debug-judging    - Judge scoring breakdown");
    println!("  POST /api/analyze          - Message, links and captions");
    println!("  GET  /api/test-generator   - Generator connectivity");
    axum::serve(listener, router).await?;
    Ok(())
}
