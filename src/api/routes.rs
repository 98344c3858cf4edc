//! API Routes
//!
//! Configures the Axum router with the assistant and cache endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_clear_handler, cache_delete_handler, cache_get_handler, cache_set_handler,
    chat_handler, code_review_handler, explain_handler, health_handler, hint_handler,
    learning_path_handler, refresh_learning_path_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /ai/hint`, `/ai/code-review`, `/ai/explain`, `/ai/chat`
/// - `POST /ai/learning-path`, `/ai/learning-path/refresh`
/// - `PUT /cache`, `DELETE /cache`, `GET|DELETE /cache/:key`
/// - `GET /stats`, `GET /health`
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ai/hint", post(hint_handler))
        .route("/ai/code-review", post(code_review_handler))
        .route("/ai/explain", post(explain_handler))
        .route("/ai/chat", post(chat_handler))
        .route("/ai/learning-path", post(learning_path_handler))
        .route("/ai/learning-path/refresh", post(refresh_learning_path_handler))
        .route("/cache", put(cache_set_handler).delete(cache_clear_handler))
        .route("/cache/:key", get(cache_get_handler).delete(cache_delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
