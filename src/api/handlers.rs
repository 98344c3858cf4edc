//! API Handlers
//!
//! HTTP request handlers for the assistant features and cache administration.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::assistant::{Assistant, AssistantError, LearningAssistant, OpenAiAssistant};
use crate::cache::{shared, CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CacheGetResponse, CacheSetRequest, ChatRequest, ChatResponse, CodeReviewRequest,
    ExplainRequest, FeatureResponse, HealthResponse, HintRequest, LearningPathRequest,
    MessageResponse, StatsResponse,
};

const DEFAULT_DIFFICULTY: u8 = 5;

/// Application state shared across all handlers.
///
/// Built once by the composition root; the cache inside it is the single
/// instance every handler and the learning assistant share.
#[derive(Clone)]
pub struct AppState {
    /// Shared response cache
    pub cache: SharedCache,
    /// Cached learning features
    pub assistant: Arc<LearningAssistant>,
    /// TTL for admin writes that omit one
    pub default_ttl: i64,
}

impl AppState {
    /// Creates state around an existing cache and completion backend.
    pub fn new(cache: SharedCache, backend: Arc<dyn Assistant>, config: &Config) -> Self {
        let assistant = LearningAssistant::new(backend, cache.clone(), &config.assistant);
        Self {
            cache,
            assistant: Arc::new(assistant),
            default_ttl: config.default_ttl,
        }
    }

    /// Creates state with a fresh cache and the OpenAI backend.
    pub fn from_config(config: &Config) -> std::result::Result<Self, AssistantError> {
        let backend = OpenAiAssistant::new(&config.assistant)?;
        Ok(Self::new(
            shared(CacheStore::new()),
            Arc::new(backend),
            config,
        ))
    }
}

fn check(error: Option<String>) -> Result<()> {
    match error {
        Some(msg) => Err(AppError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for POST /ai/hint
pub async fn hint_handler(
    State(state): State<AppState>,
    Json(req): Json<HintRequest>,
) -> Result<Json<FeatureResponse>> {
    check(req.validate())?;

    let hint = state
        .assistant
        .generate_hint(
            &req.user_id,
            &req.problem,
            &req.user_code,
            &req.language,
            req.difficulty.unwrap_or(DEFAULT_DIFFICULTY),
        )
        .await?;

    Ok(Json(FeatureResponse::new("hint", hint)))
}

/// Handler for POST /ai/code-review
pub async fn code_review_handler(
    State(state): State<AppState>,
    Json(req): Json<CodeReviewRequest>,
) -> Result<Json<FeatureResponse>> {
    check(req.validate())?;

    let review = state
        .assistant
        .review_code(&req.user_id, &req.code, &req.language, req.context.as_deref())
        .await?;

    Ok(Json(FeatureResponse::new("review", review)))
}

/// Handler for POST /ai/explain
pub async fn explain_handler(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<FeatureResponse>> {
    check(req.validate())?;

    let explanation = state
        .assistant
        .explain_concept(&req.concept, req.level, req.context.as_deref())
        .await?;

    Ok(Json(FeatureResponse::new("explanation", explanation)))
}

/// Handler for POST /ai/chat
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    check(req.validate())?;

    let response = state
        .assistant
        .general_response(&req.message, &req.conversation_context(), req.kind)
        .await?;

    Ok(Json(ChatResponse { response }))
}

/// Handler for POST /ai/learning-path
pub async fn learning_path_handler(
    State(state): State<AppState>,
    Json(req): Json<LearningPathRequest>,
) -> Result<Json<FeatureResponse>> {
    check(req.validate())?;

    let recommendations = state
        .assistant
        .learning_path(&req.user_id, &req.progress, &req.preferences)
        .await?;

    Ok(Json(FeatureResponse::new("recommendations", recommendations)))
}

/// Handler for POST /ai/learning-path/refresh
///
/// Drops the cached path and computes a fresh one.
pub async fn refresh_learning_path_handler(
    State(state): State<AppState>,
    Json(req): Json<LearningPathRequest>,
) -> Result<Json<FeatureResponse>> {
    check(req.validate())?;

    state.assistant.refresh_learning_path(&req.user_id).await;
    let recommendations = state
        .assistant
        .learning_path(&req.user_id, &req.progress, &req.preferences)
        .await?;

    Ok(Json(FeatureResponse::new("recommendations", recommendations)))
}

/// Handler for PUT /cache
pub async fn cache_set_handler(
    State(state): State<AppState>,
    Json(req): Json<CacheSetRequest>,
) -> Result<Json<MessageResponse>> {
    check(req.validate())?;

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    state.cache.write().await.set(req.key.clone(), req.value, ttl);

    Ok(Json(MessageResponse::new(format!(
        "Key '{}' set successfully",
        req.key
    ))))
}

/// Handler for GET /cache/:key
pub async fn cache_get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CacheGetResponse>> {
    // Write lock: an expired entry is dropped on read
    let mut cache = state.cache.write().await;

    match cache.get(&key) {
        Some(value) => {
            let ttl_remaining_ms = cache.ttl_remaining_ms(&key).unwrap_or_default();
            Ok(Json(CacheGetResponse {
                key,
                value,
                ttl_remaining_ms,
            }))
        }
        None => Err(AppError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:key
pub async fn cache_delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<MessageResponse> {
    state.cache.write().await.invalidate(&key);
    Json(MessageResponse::new(format!("Key '{}' invalidated", key)))
}

/// Handler for DELETE /cache
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.write().await.clear();
    info!("Cache cleared");
    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
