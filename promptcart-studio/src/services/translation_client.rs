//! MyMemory translation client

use super::TranslationService;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Translation client errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API error {0}")]
    Api(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Translation API error")]
    MissingText,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// MyMemory `GET /get` client
pub struct MyMemoryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MyMemoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TranslationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("PromptCart/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranslationService for MyMemoryClient {
    async fn translate(&self, text: &str, langpair: &str) -> Result<String, TranslationError> {
        let url = format!("{}/get", self.base_url);

        tracing::debug!(langpair = langpair, chars = text.chars().count(), "Querying translation API");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", text), ("langpair", langpair)])
            .send()
            .await
            .map_err(|e| TranslationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Api(status.as_u16()));
        }

        let body: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Parse(e.without_url().to_string()))?;

        match body.response_data.and_then(|d| d.translated_text) {
            Some(translated) if !translated.is_empty() => Ok(translated),
            _ => Err(TranslationError::MissingText),
        }
    }
}
