//! Gemini `generateContent` client

use super::OptimizationService;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default generative model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Optimization client errors
#[derive(Debug, Error)]
pub enum OptimizationError {
    /// No response was received (DNS, refused connection, timeout, proxy)
    #[error("Network error: {0}")]
    Transport(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("No response from AI")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),
}

impl OptimizationError {
    pub fn is_transport(&self) -> bool {
        matches!(self, OptimizationError::Transport(_))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Build the request URL for an endpoint, stripping trailing slashes
pub fn generate_url(endpoint: &str, model: &str, credential: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        endpoint.trim_end_matches('/'),
        model,
        credential
    )
}

/// Gemini REST client
pub struct GeminiClient {
    http_client: reqwest::Client,
    model: String,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Result<Self, OptimizationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("PromptCart/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| OptimizationError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            http_client,
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl OptimizationService for GeminiClient {
    async fn generate(
        &self,
        endpoint: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<String, OptimizationError> {
        let url = generate_url(endpoint, &self.model, credential);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, chars = prompt.chars().count(), "Calling optimizer");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| OptimizationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reported = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string));

            let message = reported.unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
            });

            return Err(OptimizationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OptimizationError::Parse(e.without_url().to_string()))?;

        match parsed.first_text() {
            Some(text) if !text.is_empty() => Ok(text.trim().to_string()),
            _ => Err(OptimizationError::EmptyResponse),
        }
    }
}
