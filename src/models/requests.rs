//! Request DTOs for the response cache API
//!
//! Field names follow the camelCase JSON the learning platform sends.

use serde::Deserialize;
use serde_json::Value;

use crate::assistant::{ResponseKind, UserLevel};

/// Maximum allowed key length for admin writes
pub const MAX_KEY_LENGTH: usize = 256;

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn require(fields: &[(&str, &str)]) -> Option<String> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(format!("Missing required fields: {}", missing.join(", ")))
    }
}

/// Request body for `POST /ai/hint`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub user_code: String,
    #[serde(default)]
    pub language: String,
    /// 1-10, defaults to 5
    #[serde(default)]
    pub difficulty: Option<u8>,
}

impl HintRequest {
    pub fn validate(&self) -> Option<String> {
        require(&[
            ("userId", self.user_id.as_str()),
            ("problem", self.problem.as_str()),
            ("userCode", self.user_code.as_str()),
            ("language", self.language.as_str()),
        ])
    }
}

/// Request body for `POST /ai/code-review`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeReviewRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub context: Option<String>,
}

impl CodeReviewRequest {
    pub fn validate(&self) -> Option<String> {
        require(&[
            ("userId", self.user_id.as_str()),
            ("code", self.code.as_str()),
            ("language", self.language.as_str()),
        ])
    }
}

/// Request body for `POST /ai/explain`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub level: UserLevel,
    #[serde(default)]
    pub context: Option<String>,
}

impl ExplainRequest {
    pub fn validate(&self) -> Option<String> {
        require(&[("concept", self.concept.as_str())])
    }
}

/// One prior turn of a chat conversation
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    /// Speaker, e.g. "user" or "assistant"
    #[serde(rename = "type")]
    pub role: String,
    pub content: String,
}

/// Request body for `POST /ai/chat`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default, rename = "type")]
    pub kind: ResponseKind,
}

impl ChatRequest {
    pub fn validate(&self) -> Option<String> {
        require(&[("message", self.message.as_str())])
    }

    /// Folds context, lesson and recent turns into the text handed to the
    /// assistant. Blank parts are left out.
    pub fn conversation_context(&self) -> String {
        let mut out = String::new();
        if !blank(&self.context) {
            out.push_str(&format!("Context: {}\n", self.context));
        }
        if let Some(lesson_id) = self.lesson_id.as_deref().filter(|id| !blank(id)) {
            out.push_str(&format!("Lesson ID: {}\n", lesson_id));
        }
        if !self.history.is_empty() {
            out.push_str("Recent conversation:\n");
            for turn in &self.history {
                out.push_str(&format!("{}: {}\n", turn.role, turn.content));
            }
        }
        out
    }
}

/// Request body for `POST /ai/learning-path` and its refresh
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub progress: Value,
    #[serde(default)]
    pub preferences: Value,
}

impl LearningPathRequest {
    pub fn validate(&self) -> Option<String> {
        require(&[("userId", self.user_id.as_str())])
    }
}

/// Request body for `PUT /cache`
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSetRequest {
    pub key: String,
    pub value: Value,
    /// TTL in seconds; zero or less stores an expired entry
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl CacheSetRequest {
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}
