//! Reasoning backend used to refine instructions and analyze businesses.
//!
//! Speaks the OpenAI-compatible Chat Completions protocol, so any provider
//! exposing `/chat/completions` (Groq, OpenAI, a local gateway) works.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{resolve_env_var, ReasoningConfig};
use crate::error::{TierError, TierResult};

const SYSTEM_PROMPT: &str = "You are a professional brand designer and marketing expert. \
Provide detailed, actionable insights for logo design and branding.";

/// A text-completion backend.
///
/// Uses `async_trait` so the backend can be held as `Box<dyn ReasoningBackend>`.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Model identifier.
    fn model(&self) -> &str;

    /// Complete a single user prompt and return the reply text.
    async fn complete(&self, prompt: &str) -> TierResult<String>;
}

/// A reply interpreted as JSON when possible, otherwise as plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(serde_json::Value),
    Text(String),
}

impl Reply {
    /// Parse reply text, tolerating a fenced ```json block.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let unfenced = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.trim_end().strip_suffix("```"))
            .map(str::trim)
            .unwrap_or(trimmed);

        match serde_json::from_str::<serde_json::Value>(unfenced) {
            Ok(value) if value.is_object() => Reply::Json(value),
            _ => Reply::Text(trimmed.to_string()),
        }
    }
}

/// OpenAI-compatible chat completions client.
pub struct ChatCompletionsBackend {
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl ChatCompletionsBackend {
    /// Build from config; fails with `Configuration` when the key is absent.
    pub fn from_config(config: &ReasoningConfig, timeout: Duration) -> TierResult<Self> {
        let api_key =
            resolve_env_var(&config.api_key).ok_or_else(|| TierError::Configuration {
                backend: "reasoning".to_string(),
                message: format!("API key not set ({})", config.api_key),
            })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TierError::remote("reasoning", format!("HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ReasoningBackend for ChatCompletionsBackend {
    fn name(&self) -> &str {
        "reasoning"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> TierResult<String> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| TierError::remote(self.name(), e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(TierError::RemoteService {
                backend: self.name().to_string(),
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| TierError::remote(self.name(), format!("invalid response: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| TierError::remote(self.name(), "empty completion"))
    }
}
