//! Integration tests for Slice 5 - HTTP API
//!
//! Tests the routes against a scripted generator

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;
use vibecheck::core::{create_router, EngineSettings, ScriptedGenerator, VibeEngine};

fn create_test_router(gen: &Arc<ScriptedGenerator>) -> axum::Router {
    create_router(Arc::new(VibeEngine::new(gen.clone(), EngineSettings::default())))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], vibecheck::VERSION);
    assert_eq!(json["settings"]["score_threshold"], 7.0);
    assert_eq!(json["settings"]["max_rounds"], 1);
}

#[tokio::test]
async fn test_captions_blank_text_rejected() {
    let gen = Arc::new(ScriptedGenerator::new());
    let app = create_test_router(&gen);

    let response = app
        .oneshot(post_json("/api/captions", r#"{"emotion": "joy", "text": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("text"));
    assert_eq!(gen.call_count(), 0);
}

#[tokio::test]
async fn test_captions_offline_fallback() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(post_json("/api/captions", r#"{"emotion": "sadness", "text": "bad day"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["emotion"], "sadness");
    let captions = json["captions"].as_array().unwrap();
    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0]["caption"], "Smile kar lo zara");
    assert_eq!(captions[1]["caption"], "Zindagi aik meme hai, enjoy kar lo");
}

#[tokio::test]
async fn test_score_supplied_captions() {
    let gen = Arc::new(ScriptedGenerator::with_responses([
        Some("TOTAL_SCORE: 7"),
        Some("TOTAL_SCORE: 9"),
    ]));
    let app = create_test_router(&gen);

    let response = app
        .oneshot(post_json(
            "/api/captions/score",
            r#"{"emotion": "joy", "text": "", "candidates": ["Pehla", "  ", "Doosra"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let captions = json["captions"].as_array().unwrap();
    assert_eq!(captions[0]["caption"], "Doosra");
    assert_eq!(captions[0]["verdict"]["total_score"], 9.0);
    assert_eq!(captions[1]["caption"], "Pehla");
}

#[tokio::test]
async fn test_score_without_candidates_rejected() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(post_json("/api/captions/score", r#"{"emotion": "joy", "candidates": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_fallback_message() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(post_json(
            "/api/recommendations",
            r#"{"emotion": "fear", "confidence": 0.82, "text": "interview tomorrow"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().starts_with("I can sense you're feeling fear"));
}

#[tokio::test]
async fn test_entertainment_links() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(post_json(
            "/api/entertainment",
            r#"{"emotion": "sadness", "confidence": 0.6, "text": "lonely"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movies"][0]["title"], "Taare Zameen Par");
    assert_eq!(json["music"][0]["spotify"], "https://open.spotify.com/search/Soulmate%20Badshah");
    assert_eq!(json["books"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_debug_judging_breakdown() {
    let gen = Arc::new(ScriptedGenerator::with_responses([
        Some(
            "TONE_SCORE: 1\nTONE_REASON: flat\nRELEVANCE_SCORE: 1\nRELEVANCE_REASON: off topic\n\
             APPROPRIATENESS_SCORE: 2.5\nAPPROPRIATENESS_REASON: clean\nSAFETY_SCORE: 2.5\nSAFETY_REASON: safe\n\
             TOTAL_SCORE: 7\nOVERALL_CRITIQUE: Good",
        ),
        Some("unused"),
    ]));
    let app = create_test_router(&gen);

    let response = app
        .oneshot(post_json("/api/debug-judging", r#"{"caption": "Chai pe charcha"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["emotion"], "happy");
    assert_eq!(json["original_caption"], "Chai pe charcha");
    assert_eq!(json["improved_caption"], "Chai pe charcha");
    assert_eq!(json["state"], "JUDGED");

    let breakdown = &json["judge_breakdown"];
    assert_eq!(breakdown["tone"]["score"], 1.0);
    assert_eq!(breakdown["relevance"]["reason"], "off topic");
    assert_eq!(breakdown["safety"]["score"], 2.5);
    assert_eq!(breakdown["total_score"], 7.0);
    assert_eq!(breakdown["overall_critique"], "Good");
    assert!(breakdown.get("wit").is_none());
    assert_eq!(gen.remaining(), 1);
}

#[tokio::test]
async fn test_debug_judging_requires_caption() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(post_json("/api/debug-judging", r#"{"emotion": "sad"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No caption provided");
}

#[tokio::test]
async fn test_debug_judging_outage_skips() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(post_json("/api/debug-judging", r#"{"caption": "Hello", "emotion": "anger"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["improved_caption"], "Hello");
    assert_eq!(json["reason"], "J001_JUDGE_UNAVAILABLE");
    assert!(json["judge_breakdown"]["total_score"].is_null());
    assert!(json["judge_breakdown"]["tone"]["score"].is_null());
}

#[tokio::test]
async fn test_analyze_returns_all_three_parts() {
    let gen = Arc::new(ScriptedGenerator::with_responses([
        Some("Thoda aaram karo"),
        Some("TOTAL_SCORE: 9"),
        Some("Books:\nThe Alchemist - Paulo Coelho"),
        Some("Pehla\nDoosra"),
        Some("TOTAL_SCORE: 9"),
        Some("TOTAL_SCORE: 8"),
    ]));
    let app = create_test_router(&gen);

    let response = app
        .oneshot(post_json(
            "/api/analyze",
            r#"{"emotion": "sadness", "confidence": 0.7, "text": "thak gaya hoon"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["emotion"], "sadness");
    assert_eq!(json["confidence"], 0.7);
    assert_eq!(json["message"], "Thoda aaram karo");
    assert_eq!(json["entertainment"]["books"][0]["author"], "Paulo Coelho");
    assert_eq!(json["captions"][0]["caption"], "Pehla");
    assert_eq!(json["captions"][1]["caption"], "Doosra");
    assert_eq!(gen.remaining(), 0);
}

#[tokio::test]
async fn test_analyze_requires_emotion() {
    let gen = Arc::new(ScriptedGenerator::new());
    let app = create_test_router(&gen);

    let response = app
        .oneshot(post_json("/api/analyze", r#"{"text": "kuch nahi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing required field: emotion");
    assert_eq!(gen.call_count(), 0);
}

#[tokio::test]
async fn test_generator_check_reports_reply() {
    let gen = Arc::new(ScriptedGenerator::with_responses([Some("Hello hello!")]));
    let app = create_test_router(&gen);

    let response = app
        .oneshot(Request::builder().uri("/api/test-generator").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["reply"], "Hello hello!");
    assert_eq!(gen.call_count(), 1);
}

#[tokio::test]
async fn test_generator_check_reports_outage() {
    let app = create_test_router(&Arc::new(ScriptedGenerator::new()));

    let response = app
        .oneshot(Request::builder().uri("/api/test-generator").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unavailable");
    assert!(json["reply"].is_null());
}
