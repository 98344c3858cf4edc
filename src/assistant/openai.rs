//! OpenAI-compatible chat-completions backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{Assistant, AssistantError, CompletionRequest};
use crate::config::AssistantConfig;

// == Wire Types ==
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// == OpenAI Assistant ==
/// Calls `POST {base_url}/chat/completions` with bearer auth.
pub struct OpenAiAssistant {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiAssistant {
    /// Builds a client from configuration.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for OpenAiAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAssistant")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::NotConfigured)?;

        debug!(model = %request.model, max_tokens = request.max_tokens, "assistant request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        if let Some(err) = status_error(status, &text) {
            warn!(status = status.as_u16(), "assistant request failed: {}", err);
            return Err(err);
        }

        parse_completion(&text).map_err(|message| AssistantError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

// == Helpers ==
fn request_body(request: &CompletionRequest) -> Value {
    json!({
        "model": request.model,
        "messages": [
            { "role": "system", "content": request.system_prompt },
            { "role": "user", "content": request.user_prompt },
        ],
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    })
}

/// Maps a non-success status to an error, or None on success.
fn status_error(status: StatusCode, body: &str) -> Option<AssistantError> {
    if status.is_success() {
        return None;
    }
    let message = error_message(body);
    Some(match status {
        StatusCode::TOO_MANY_REQUESTS => AssistantError::RateLimited(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AssistantError::InvalidInput(message)
        }
        _ => AssistantError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

/// Pulls `error.message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// First choice's content, or empty when there is none.
fn parse_completion(body: &str) -> Result<String, String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed completion: {}", e))?;

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default())
}
