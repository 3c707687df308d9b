//! Remote enrichment services
//!
//! Trait seams for the translation and optimization endpoints, plus their
//! reqwest-backed clients.

pub mod optimizer_client;
pub mod translation_client;

use async_trait::async_trait;

pub use optimizer_client::{GeminiClient, OptimizationError};
pub use translation_client::{MyMemoryClient, TranslationError};

/// Translates text between the two display languages
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translate `text` using a `src|dst` language pair (e.g. `zh|en`)
    async fn translate(&self, text: &str, langpair: &str) -> Result<String, TranslationError>;
}

/// Rewrites prompt text through a generative model
#[async_trait]
pub trait OptimizationService: Send + Sync {
    /// Send `prompt` to the model at `endpoint`, authenticated by `credential`
    async fn generate(
        &self,
        endpoint: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<String, OptimizationError>;
}
