//! Response DTOs for the response cache API

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for the structured assistant features.
///
/// The payload is flattened under a feature-specific field name, e.g.
/// `{"success": true, "hint": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureResponse {
    pub success: bool,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

impl FeatureResponse {
    pub fn new(field: &str, value: Value) -> Self {
        let mut payload = serde_json::Map::new();
        payload.insert(field.to_string(), value);
        Self {
            success: true,
            payload,
        }
    }
}

/// Response body for `POST /ai/chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct CacheGetResponse {
    pub key: String,
    pub value: Value,
    /// Milliseconds until the entry stops being served
    pub ttl_remaining_ms: i64,
}

/// Acknowledgement for admin writes and deletes
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
