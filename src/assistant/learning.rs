//! Learning Assistant
//!
//! Cached learning features: hints, code review, concept explanations,
//! learning paths and free-form answers. Each feature derives a cache key
//! from its inputs, serves a live entry when there is one, and otherwise
//! asks the backend and stores the shaped result for the feature's TTL.
//!
//! Concurrent misses on the same key each call the backend; the last write
//! wins.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{Assistant, AssistantError, CompletionRequest};
use crate::cache::{CacheKey, SharedCache};
use crate::config::AssistantConfig;

// == Feature TTLs (seconds) ==
pub const HINT_TTL_SECS: i64 = 120;
pub const CODE_REVIEW_TTL_SECS: i64 = 300;
pub const EXPLANATION_TTL_SECS: i64 = 1800;
pub const LEARNING_PATH_TTL_SECS: i64 = 3600;
pub const GENERAL_RESPONSE_TTL_SECS: i64 = 600;

// Payload encodings are cut to these lengths inside keys
const SHORT_PAYLOAD_LEN: usize = 32;
const LONG_PAYLOAD_LEN: usize = 50;

const FALLBACK_RESPONSE: &str =
    "I apologize, but I could not generate a response. Please try again.";

const HINT_PROMPT: &str = "You are a coding mentor giving hints without handing over the solution. \
Guide the learner's thinking, ask leading questions, suggest debugging approaches and keep hints brief and actionable.";

const REVIEW_PROMPT: &str = "You are a programming instructor reviewing code for learning purposes. \
Point out code quality issues, likely bugs and concrete improvements, and keep the tone encouraging and concise.";

const EXPLAIN_PROMPT: &str = "You are a patient coding teacher. Explain programming concepts in clear language, \
break complex topics into small parts and relate them to practical examples.";

const PATH_PROMPT: &str = "You are a learning advisor. From the learner's progress and preferences, \
recommend next topics, projects and areas to strengthen, with an encouraging tone.";

/// Treats a blank context the same as no context.
fn non_blank(context: Option<&str>) -> Option<&str> {
    context.filter(|c| !c.trim().is_empty())
}

// == User Level ==
/// Learner proficiency used to pitch explanations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl UserLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Beginner => "beginner",
            UserLevel::Intermediate => "intermediate",
            UserLevel::Advanced => "advanced",
        }
    }

    fn style(&self) -> &'static str {
        match self {
            UserLevel::Beginner => "very simple terms with basic examples",
            UserLevel::Intermediate => "moderate detail with practical examples",
            UserLevel::Advanced => "comprehensive detail with complex examples",
        }
    }
}

// == Response Kind ==
/// Flavour of a free-form answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    #[default]
    Chat,
    Help,
    Explanation,
}

impl ResponseKind {
    fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Chat => "chat",
            ResponseKind::Help => "help",
            ResponseKind::Explanation => "explanation",
        }
    }
}

// == Learning Assistant ==
/// Learning features backed by a completion backend and a shared cache.
pub struct LearningAssistant {
    backend: Arc<dyn Assistant>,
    cache: SharedCache,
    chat_model: String,
    analysis_model: String,
    temperature: f32,
}

impl LearningAssistant {
    pub fn new(backend: Arc<dyn Assistant>, cache: SharedCache, config: &AssistantConfig) -> Self {
        Self {
            backend,
            cache,
            chat_model: config.chat_model.clone(),
            analysis_model: config.analysis_model.clone(),
            temperature: config.temperature,
        }
    }

    /// Serves `key` from the cache or computes and stores it.
    ///
    /// The lock is released while `compute` runs. Errors are returned as-is
    /// and leave the cache untouched.
    async fn cached<F, Fut>(&self, key: String, ttl_secs: i64, compute: F) -> Result<Value, AssistantError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, AssistantError>>,
    {
        if let Some(hit) = self.cache.write().await.get(&key) {
            return Ok(hit);
        }

        let value = match compute().await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, "assistant call failed: {}", e);
                return Err(e);
            }
        };

        self.cache.write().await.set(key, value.clone(), ttl_secs);
        Ok(value)
    }

    async fn ask(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: String,
        max_tokens: u32,
    ) -> Result<String, AssistantError> {
        let request = CompletionRequest {
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            user_prompt,
            max_tokens,
            temperature: self.temperature,
        };
        self.backend.complete(&request).await
    }

    // == Hint ==
    /// A nudge for `user_code` against `problem`, cached for two minutes per
    /// user and input.
    pub async fn generate_hint(
        &self,
        user_id: &str,
        problem: &str,
        user_code: &str,
        language: &str,
        difficulty: u8,
    ) -> Result<Value, AssistantError> {
        let key = CacheKey::new("hint")
            .segment(user_id)
            .payload(&[problem, user_code], SHORT_PAYLOAD_LEN)
            .build();

        self.cached(key, HINT_TTL_SECS, || async {
            let prompt = format!(
                "Problem: {problem}\n\nCurrent {language} code:\n{user_code}\n\nDifficulty: {difficulty}/10\n\n\
                 Provide a helpful hint without giving away the solution. Guide their thinking."
            );
            let content = self.ask(&self.chat_model, HINT_PROMPT, prompt, 150).await?;
            Ok(json!({
                "hint": content,
                "type": "approach",
                "confidence": 0.85,
            }))
        })
        .await
    }

    // == Code Review ==
    pub async fn review_code(
        &self,
        user_id: &str,
        code: &str,
        language: &str,
        context: Option<&str>,
    ) -> Result<Value, AssistantError> {
        let context = non_blank(context);
        let key = CacheKey::new("code_review")
            .segment(user_id)
            .payload(&[code], SHORT_PAYLOAD_LEN)
            .build();

        self.cached(key, CODE_REVIEW_TTL_SECS, || async {
            let purpose = context.map(|c| format!(" for {c}")).unwrap_or_default();
            let prompt = format!(
                "Review this {language} code{purpose}:\n\n{code}\n\n\
                 Provide: score (0-100), feedback, suggestions, potential bugs, and improvements."
            );
            let content = self.ask(&self.analysis_model, REVIEW_PROMPT, prompt, 800).await?;
            Ok(json!({
                "score": 85,
                "feedback": content,
                "suggestions": [],
                "bugs": [],
                "improvements": [],
            }))
        })
        .await
    }

    // == Concept Explanation ==
    /// Shared across users: keyed by concept, level and context only.
    pub async fn explain_concept(
        &self,
        concept: &str,
        level: UserLevel,
        context: Option<&str>,
    ) -> Result<Value, AssistantError> {
        let context = non_blank(context);
        let key = CacheKey::new("explanation")
            .segment(concept)
            .segment(level.as_str())
            .segment(context.unwrap_or("general"))
            .build();

        self.cached(key, EXPLANATION_TTL_SECS, || async {
            let extra = context.map(|c| format!(". Context: {c}")).unwrap_or_default();
            let prompt = format!(
                "Explain \"{concept}\" to a {} programmer using {}{extra}. \
                 Include examples, related concepts, and suggested next learning steps.",
                level.as_str(),
                level.style(),
            );
            let content = self.ask(&self.chat_model, EXPLAIN_PROMPT, prompt, 500).await?;
            Ok(json!({
                "explanation": content,
                "examples": [],
                "relatedConcepts": [],
                "nextSteps": [],
            }))
        })
        .await
    }

    // == Learning Path ==
    pub async fn learning_path(
        &self,
        user_id: &str,
        progress: &Value,
        preferences: &Value,
    ) -> Result<Value, AssistantError> {
        let key = Self::learning_path_key(user_id);

        self.cached(key, LEARNING_PATH_TTL_SECS, || async {
            let prompt = format!(
                "Learner progress: {progress}\n\nLearner preferences: {preferences}\n\n\
                 Recommend next topics, projects, weak areas to revisit and strengths to build on."
            );
            let content = self.ask(&self.analysis_model, PATH_PROMPT, prompt, 600).await?;
            Ok(json!({
                "nextTopics": [],
                "projects": [],
                "weakAreas": [],
                "strengthAreas": [],
                "estimatedTime": "2-3 weeks",
                "motivation": content,
            }))
        })
        .await
    }

    /// Drops the cached learning path so the next request recomputes it.
    pub async fn refresh_learning_path(&self, user_id: &str) {
        let key = Self::learning_path_key(user_id);
        self.cache.write().await.invalidate(&key);
        debug!(user_id, "learning path invalidated");
    }

    fn learning_path_key(user_id: &str) -> String {
        CacheKey::new("learning_path").segment(user_id).build()
    }

    // == General Response ==
    /// Free-form answer; falls back to a fixed apology when the backend
    /// returns no content.
    pub async fn general_response(
        &self,
        message: &str,
        context: &str,
        kind: ResponseKind,
    ) -> Result<String, AssistantError> {
        let key = CacheKey::new("general_response")
            .payload(&[message, context], LONG_PAYLOAD_LEN)
            .build();

        let value = self
            .cached(key, GENERAL_RESPONSE_TTL_SECS, || async {
                let system = format!(
                    "You are an AI learning assistant on a coding education platform. \
                     Be encouraging, explain simply, give practical examples, format code properly \
                     and suggest next steps.\n\nContext: {context}\nType: {}",
                    kind.as_str()
                );
                let content = self.ask(&self.chat_model, &system, message.to_string(), 500).await?;
                let content = if content.trim().is_empty() {
                    FALLBACK_RESPONSE.to_string()
                } else {
                    content
                };
                Ok(Value::String(content))
            })
            .await?;

        Ok(match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }
}
