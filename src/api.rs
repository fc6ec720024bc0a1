//! LLM API interaction for report generation.
//!
//! This module sends a prompt to an OpenAI-compatible chat completions
//! endpoint (DeepSeek by default) and returns the generated text.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`ChatClient`]: Implementation backed by `POST {api_base_url}/chat/completions`
//!
//! Each call is a single request: no retries, no streaming. Failures come back
//! as [`ApiError`] so callers never confuse an error message with model output.

use crate::config::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Errors returned by the text-generation service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failure, timeout, or unreadable body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not a chat completion.
    #[error("unexpected response format: {0}")]
    Parse(#[from] serde_json::Error),

    /// The completion carried no choices or no content.
    #[error("response contained no generated text")]
    EmptyResponse,
}

/// Trait for async LLM interaction.
///
/// Implementors send a system prompt and a user prompt to an LLM and return
/// the generated text.
pub trait AskAsync {
    /// Generate text for `prompt`, capped at `max_tokens` output tokens.
    async fn ask(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String, ApiError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Build a client from analyzer settings and a resolved API key.
    pub fn new(config: &AnalyzerConfig, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AskAsync for ChatClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model, max_tokens = max_tokens))]
    async fn ask(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String, ApiError> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(elapsed_ms = dt.as_millis() as u64, %status, "API call failed");
            return Err(ApiError::Status { status, body });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ApiError::EmptyResponse)?;

        info!(
            elapsed_ms = dt.as_millis() as u64,
            chars = text.chars().count(),
            "API call succeeded"
        );
        Ok(text)
    }
}
