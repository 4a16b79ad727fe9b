use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use quiz_league::config::{Config, ProviderKind};
use quiz_league::services::provider_service::TextProvider;
use quiz_league::{routes, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const GOLD: &str = r#"```json
{"question":"What is the chemical symbol for gold?","options":{"A":"Ag","B":"Au","C":"Gd","D":"Go"},"answer":"B","explanation":"From Latin aurum."}
```"#;

struct StubProvider {
    reply: String,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn complete(&self, _prompt: &str) -> quiz_league::error::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        provider: ProviderKind::Gemini,
        api_key: "test-key".to_string(),
        model: "stub-model".to_string(),
        provider_timeout: Duration::from_secs(5),
        max_attempts: 4,
        recency_capacity: 50,
        quiz_rps: 100,
        cors_origins: vec!["*".to_string()],
    }
}

fn setup_app(provider: Arc<StubProvider>) -> Router {
    let config = test_config();
    let state = AppState::new(&config, provider);
    routes::router(state, config.quiz_rps)
}

async fn post_next(app: &Router, body: JsonValue) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("POST")
        .uri("/quiz/next")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = setup_app(StubProvider::new(GOLD));
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn next_question_keeps_meaning_of_answer() {
    let provider = StubProvider::new(GOLD);
    let app = setup_app(provider.clone());

    let (status, body) = post_next(&app, json!({"category": "science", "difficulty": "easy"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.calls(), 1);

    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["category"], "science");
    assert_eq!(body["difficulty"], "easy");
    assert_eq!(body["question"], "What is the chemical symbol for gold?");
    assert_eq!(body["explanation"], "From Latin aurum.");

    let options = body["options"].as_object().unwrap();
    let labels: BTreeSet<&str> = options.keys().map(String::as_str).collect();
    assert_eq!(labels, BTreeSet::from(["A", "B", "C", "D"]));
    let texts: BTreeSet<&str> = options.values().filter_map(|v| v.as_str()).collect();
    assert_eq!(texts, BTreeSet::from(["Ag", "Au", "Gd", "Go"]));

    let answer = body["answer"].as_str().unwrap();
    assert_eq!(options[answer], "Au");
}

#[tokio::test]
async fn difficulty_defaults_and_is_case_insensitive() {
    let app = setup_app(StubProvider::new(GOLD));
    let (status, body) = post_next(&app, json!({"category": "  History "})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["difficulty"], "progressive");
    assert_eq!(body["category"], "History");

    let app = setup_app(StubProvider::new(GOLD));
    let (status, body) = post_next(&app, json!({"category": "history", "difficulty": " HARD "})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["difficulty"], "hard");
}

#[tokio::test]
async fn bad_input_fails_fast_without_calling_provider() {
    let provider = StubProvider::new(GOLD);
    let app = setup_app(provider.clone());

    let (status, body) = post_next(&app, json!({"category": "   ", "difficulty": "easy"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = post_next(&app, json!({"category": "", "difficulty": "easy"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_next(&app, json!({"category": "science", "difficulty": "legendary"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("legendary"));

    let (status, _) = post_next(&app, json!({"difficulty": "easy"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn non_json_provider_output_is_bad_upstream_data() {
    let provider = StubProvider::new("I'm sorry, I can't help with that.");
    let app = setup_app(provider.clone());

    let (status, body) = post_next(&app, json!({"category": "science", "difficulty": "easy"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("non-JSON"));
    assert_eq!(provider.calls(), 4);
}

#[tokio::test]
async fn repeated_question_exhausts_with_generation_failed() {
    let provider = StubProvider::new(GOLD);
    let app = setup_app(provider.clone());

    let (status, _) = post_next(&app, json!({"category": "science", "difficulty": "easy"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_next(&app, json!({"category": "Science", "difficulty": "Easy"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Generation failed"));
    assert!(message.contains("no unique question available"));
    assert_eq!(provider.calls(), 1 + 4);

    let (status, _) = post_next(&app, json!({"category": "science", "difficulty": "hard"})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn categories_lists_suggestions() {
    let app = setup_app(StubProvider::new(GOLD));
    let req = Request::builder()
        .method("GET")
        .uri("/quiz/categories")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 4096).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["difficulties"], json!(["easy", "medium", "hard", "progressive"]));
    assert!(body["categories"]
        .as_array()
        .unwrap()
        .contains(&json!("general knowledge")));
}

#[tokio::test]
async fn request_budget_rejects_bursts() {
    let config = test_config();
    let state = AppState::new(&config, StubProvider::new(GOLD));
    let app = routes::router(state, 1);

    let (status, _) = post_next(&app, json!({"category": "science"})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post_next(&app, json!({"category": "geography"})).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}
