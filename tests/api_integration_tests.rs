//! Integration Tests for API Endpoints
//!
//! Drives the full router with a manual clock and a counting stub backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use response_cache::api::create_router;
use response_cache::assistant::{Assistant, AssistantError, CompletionRequest};
use response_cache::cache::{shared, CacheStore, ManualClock};
use response_cache::{AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helpers ==

#[derive(Default)]
struct CountingAssistant {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl Assistant for CountingAssistant {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AssistantError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(AssistantError::RateLimited("quota exhausted".into()));
        }
        Ok(format!("{} #{}", request.model, n))
    }
}

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    backend: Arc<CountingAssistant>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_backend(CountingAssistant::default())
    }

    fn with_backend(backend: CountingAssistant) -> Self {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let backend = Arc::new(backend);
        let state = AppState::new(
            shared(CacheStore::with_clock(clock.clone())),
            backend.clone(),
            &Config::default(),
        );
        Self {
            router: create_router(state),
            clock,
            backend,
        }
    }

    fn calls(&self) -> usize {
        self.backend.calls.load(Ordering::SeqCst)
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

fn hint_body() -> Value {
    json!({
        "userId": "user1",
        "problem": "Sum the numbers in a list",
        "userCode": "let total = 0;",
        "language": "rust",
        "difficulty": 3
    })
}

// == Assistant Endpoints ==

#[tokio::test]
async fn test_hint_is_served_from_cache_until_expiry() {
    let app = TestApp::new();

    let (status, first) = app.send("POST", "/ai/hint", Some(hint_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["hint"]["hint"], "gpt-4o-mini #1");

    let (_, second) = app.send("POST", "/ai/hint", Some(hint_body())).await;
    assert_eq!(second, first);
    assert_eq!(app.calls(), 1);

    app.clock.advance_secs(121);
    let (_, third) = app.send("POST", "/ai/hint", Some(hint_body())).await;
    assert_eq!(third["hint"]["hint"], "gpt-4o-mini #2");
    assert_eq!(app.calls(), 2);
}

#[tokio::test]
async fn test_hint_missing_fields_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .send("POST", "/ai/hint", Some(json!({"userId": "u", "problem": "p"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("userCode"));
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_code_review() {
    let app = TestApp::new();
    let body = json!({"userId": "u", "code": "print(1)", "language": "python"});

    let (status, json) = app.send("POST", "/ai/code-review", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["review"]["feedback"], "gpt-4o #1");
    assert_eq!(json["review"]["score"], 85);

    app.clock.advance_secs(299);
    app.send("POST", "/ai/code-review", Some(body)).await;
    assert_eq!(app.calls(), 1);
}

#[tokio::test]
async fn test_explanation_shared_between_users() {
    let app = TestApp::new();
    let body = json!({"concept": "ownership", "level": "intermediate"});

    let (status, json) = app.send("POST", "/ai/explain", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["explanation"]["explanation"], "gpt-4o-mini #1");

    app.send("POST", "/ai/explain", Some(body)).await;
    assert_eq!(app.calls(), 1);

    let (_, cached) = app
        .send("GET", "/cache/explanation:ownership:intermediate:general", None)
        .await;
    assert_eq!(cached["value"]["explanation"], "gpt-4o-mini #1");
}

#[tokio::test]
async fn test_explanation_blank_context_shares_general_entry() {
    let app = TestApp::new();

    let (status, _) = app
        .send("POST", "/ai/explain", Some(json!({"concept": "x", "context": ""})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("GET", "/cache/explanation:x:beginner:general", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    app.send("POST", "/ai/explain", Some(json!({"concept": "x"})))
        .await;
    assert_eq!(app.calls(), 1);
}

#[tokio::test]
async fn test_missing_user_id_is_bad_request() {
    let app = TestApp::new();

    for uri in ["/ai/hint", "/ai/code-review", "/ai/learning-path"] {
        let (status, body) = app
            .send(
                "POST",
                uri,
                Some(json!({"problem": "p", "userCode": "c", "code": "c", "language": "rust"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("userId"));
        assert_eq!(body["retryable"], false);
    }
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_chat_history_changes_cache_entry() {
    let app = TestApp::new();

    app.send("POST", "/ai/chat", Some(json!({"message": "and then?"})))
        .await;
    let (_, json) = app
        .send(
            "POST",
            "/ai/chat",
            Some(json!({
                "message": "and then?",
                "lessonId": "week-1",
                "history": [{"type": "user", "content": "explain loops"}]
            })),
        )
        .await;
    assert_eq!(json["response"], "gpt-4o-mini #2");
    assert_eq!(app.calls(), 2);
}

#[tokio::test]
async fn test_chat_response() {
    let app = TestApp::new();

    let (status, json) = app
        .send("POST", "/ai/chat", Some(json!({"message": "What is a closure?"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "gpt-4o-mini #1");
}

#[tokio::test]
async fn test_learning_path_refresh_recomputes() {
    let app = TestApp::new();
    let body = json!({"userId": "u", "progress": {"lessons": 4}});

    let (_, first) = app.send("POST", "/ai/learning-path", Some(body.clone())).await;
    assert_eq!(first["recommendations"]["motivation"], "gpt-4o #1");
    app.send("POST", "/ai/learning-path", Some(body.clone())).await;
    assert_eq!(app.calls(), 1);

    let (status, refreshed) = app
        .send("POST", "/ai/learning-path/refresh", Some(body))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["recommendations"]["motivation"], "gpt-4o #2");
    assert_eq!(app.calls(), 2);
}

#[tokio::test]
async fn test_backend_failure_is_surfaced_and_not_cached() {
    let app = TestApp::with_backend(CountingAssistant {
        fail: true,
        ..CountingAssistant::default()
    });

    let (status, body) = app.send("POST", "/ai/hint", Some(hint_body())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["retryable"], true);

    app.send("POST", "/ai/hint", Some(hint_body())).await;
    assert_eq!(app.calls(), 2);

    let (_, stats) = app.send("GET", "/stats", None).await;
    assert_eq!(stats["sets"], 0);
    assert_eq!(stats["total_entries"], 0);
}

// == Cache Administration ==

#[tokio::test]
async fn test_cache_scenario_via_api() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            "PUT",
            "/cache",
            Some(json!({"key": "user1:abcd", "value": {"hint": "try a for-loop"}, "ttl": 120})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.send("GET", "/cache/user1:abcd", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], json!({"hint": "try a for-loop"}));
    assert_eq!(json["ttl_remaining_ms"], 120_000);

    app.clock.advance_secs(20);
    let (_, json) = app.send("GET", "/cache/user1:abcd", None).await;
    assert_eq!(json["ttl_remaining_ms"], 100_000);

    app.clock.advance_secs(121);
    let (status, _) = app.send("GET", "/cache/user1:abcd", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zero_ttl_via_api() {
    let app = TestApp::new();

    app.send("PUT", "/cache", Some(json!({"key": "k", "value": "a", "ttl": 0})))
        .await;
    let (status, body) = app.send("GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_default_ttl_via_api() {
    let app = TestApp::new();

    app.send("PUT", "/cache", Some(json!({"key": "k", "value": 1})))
        .await;
    app.clock.advance_secs(299);
    let (status, _) = app.send("GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance_secs(1);
    let (status, _) = app.send("GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_and_clear() {
    let app = TestApp::new();

    for key in ["a", "b"] {
        app.send("PUT", "/cache", Some(json!({"key": key, "value": key})))
            .await;
    }

    let (status, _) = app.send("DELETE", "/cache/a", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send("GET", "/cache/a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send("GET", "/cache/b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = TestApp::new();

    let (status, body) = app
        .send("PUT", "/cache", Some(json!({"key": "", "value": "test"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

// == Stats and Health ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = TestApp::new();

    app.send("PUT", "/cache", Some(json!({"key": "s", "value": 1, "ttl": 10})))
        .await;
    app.send("GET", "/cache/s", None).await; // hit
    app.send("GET", "/cache/missing", None).await; // miss
    app.clock.advance_secs(10);
    app.send("GET", "/cache/s", None).await; // expired

    let (status, json) = app.send("GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 2);
    assert_eq!(json["expired"], 1);
    assert_eq!(json["total_entries"], 0);
    assert!((json["hit_rate"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
