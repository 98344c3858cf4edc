//! Assistant Module
//!
//! The expensive computation the cache sits in front of: a chat-completion
//! backend, and the learning features built on it.

mod learning;
mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use learning::{LearningAssistant, ResponseKind, UserLevel};
pub use openai::OpenAiAssistant;

// == Assistant Error ==
/// Failures of the completion backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistantError {
    /// The backend throttled the request
    #[error("Assistant rate limited: {0}")]
    RateLimited(String),

    /// The backend answered with a non-success status or an unreadable body
    #[error("Assistant API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request was rejected as malformed
    #[error("Invalid assistant input: {0}")]
    InvalidInput(String),

    /// Transport failure before a response arrived
    #[error("Assistant network error: {0}")]
    Network(String),

    /// No API key is configured
    #[error("Assistant is not configured")]
    NotConfigured,
}

impl AssistantError {
    /// Whether repeating the same request may succeed.
    pub fn retryable(&self) -> bool {
        match self {
            AssistantError::RateLimited(_) | AssistantError::Network(_) => true,
            AssistantError::Api { status, .. } => *status >= 500,
            AssistantError::InvalidInput(_) | AssistantError::NotConfigured => false,
        }
    }
}

// == Completion Request ==
/// One system + user prompt exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

// == Assistant Trait ==
/// A chat-completion backend.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Returns the completion text; an empty string when the backend
    /// produced no content.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AssistantError>;
}
