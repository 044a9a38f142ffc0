//! LLM providers and the provider seam
//!
//! The relay treats the completion backend as a black box: one request in,
//! generated text or an error out.

mod http_utils;
mod openai_compat;
/// Implementations of specific LLM providers
pub mod providers;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::RelaySettings;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Error returned by the provider's API
    #[error("API error: {0}")]
    ApiError(String),
    /// Error during network communication
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    JsonError(String),
    /// Missing provider configuration or API key
    #[error("Missing client/API key: {0}")]
    MissingConfig(String),
    /// Rate limit exceeded (429), optionally with a wait time
    #[error("Rate limit exceeded: {message} (wait: {wait_secs:?}s)")]
    RateLimit {
        /// Retry-After duration in seconds, if provided by the server
        wait_secs: Option<u64>,
        /// Error message from the server
        message: String,
    },
    /// The response carried no choices at all
    #[error("Empty response")]
    EmptyResponse,
    /// The composed prompt exceeds the configured token limit
    #[error("Prompt too large: {tokens} tokens (limit {limit})")]
    PromptTooLarge {
        /// Estimated prompt size
        tokens: usize,
        /// Configured limit
        limit: usize,
    },
    /// Any other unexpected error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LlmError {
    /// Short stable label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "api",
            Self::NetworkError(_) => "network",
            Self::JsonError(_) => "json",
            Self::MissingConfig(_) => "config",
            Self::RateLimit { .. } => "rate_limit",
            Self::EmptyResponse => "empty_response",
            Self::PromptTooLarge { .. } => "prompt_too_large",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// One completion call: fixed model and sampling parameters plus the two prompts
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Provider-side model identifier
    pub model_id: String,
    /// System instruction text
    pub system_prompt: String,
    /// User prompt text
    pub user_prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token cap
    pub max_tokens: u32,
}

/// Interface for all LLM providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a chat completion.
    ///
    /// A successful call may return an empty string when the model produced
    /// no content.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Build the provider selected by `llm_provider`.
///
/// # Errors
///
/// Returns `LlmError::MissingConfig` for an unknown provider name.
pub fn build_provider(settings: &RelaySettings) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider: Arc<dyn LlmProvider> = match settings.llm_provider.as_str() {
        "openrouter" => Arc::new(providers::OpenRouterProvider::new(
            settings.openrouter_api_key.clone(),
            settings.llm_api_base.clone(),
            settings.openrouter_site_url.clone(),
            settings.openrouter_site_name.clone(),
            settings.llm_http_timeout_secs,
        )),
        "openai_compat" => Arc::new(providers::OpenAiCompatProvider::new(
            settings.openrouter_api_key.clone(),
            settings.llm_api_base.clone(),
        )),
        other => return Err(LlmError::MissingConfig(format!("llm_provider {other}"))),
    };

    info!(
        provider = %settings.llm_provider,
        api_base = %settings.llm_api_base,
        model = %settings.chat_model_id,
        "LLM provider initialized"
    );
    Ok(provider)
}
