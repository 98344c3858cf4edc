//! Configuration Module
//!
//! Loads server and assistant settings from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for admin writes that do not name one
    pub default_ttl: i64,
    /// Seconds between expired-entry sweeps, 0 disables the sweep
    pub sweep_interval: u64,
    /// Settings for the chat-completion backend
    pub assistant: AssistantConfig,
}

/// Settings for the chat-completion backend.
#[derive(Clone)]
pub struct AssistantConfig {
    /// API key; the assistant refuses requests when unset
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model for hints, explanations and free-form chat
    pub chat_model: String,
    /// Model for code review and learning paths
    pub analysis_model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("analysis_model", &self.analysis_model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn string_env(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds, 0 disables (default: 60)
    /// - `OPENAI_API_KEY` - Assistant API key (default: unset)
    /// - `OPENAI_BASE_URL` - Assistant API base (default: `https://api.openai.com/v1`)
    /// - `CHAT_MODEL` - (default: `gpt-4o-mini`)
    /// - `ANALYSIS_MODEL` - (default: `gpt-4o`)
    /// - `AI_TEMPERATURE` - (default: 0.7)
    /// - `AI_TIMEOUT_SECS` - (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("SERVER_PORT", defaults.server_port),
            default_ttl: parse_env("DEFAULT_TTL", defaults.default_ttl),
            sweep_interval: parse_env("SWEEP_INTERVAL", defaults.sweep_interval),
            assistant: AssistantConfig {
                api_key: env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
                base_url: string_env("OPENAI_BASE_URL", &defaults.assistant.base_url),
                chat_model: string_env("CHAT_MODEL", &defaults.assistant.chat_model),
                analysis_model: string_env("ANALYSIS_MODEL", &defaults.assistant.analysis_model),
                temperature: parse_env("AI_TEMPERATURE", defaults.assistant.temperature),
                timeout_secs: parse_env("AI_TIMEOUT_SECS", defaults.assistant.timeout_secs),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_ttl: 300,
            sweep_interval: 60,
            assistant: AssistantConfig::default(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            analysis_model: "gpt-4o".to_string(),
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}
