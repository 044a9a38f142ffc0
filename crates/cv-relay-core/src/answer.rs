//! Answer generation over the loaded context document.
//!
//! One question produces exactly one provider call. Failures never escape
//! [`AnswerGenerator::answer`]: the user gets a fixed fallback message and
//! the error kind goes to the log.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, warn};

use crate::config::{
    RelaySettings, CHAT_MAX_TOKENS, CHAT_TEMPERATURE, DEFAULT_CHAT_MODEL_ID,
    DEFAULT_MAX_PROMPT_TOKENS, FALLBACK_MESSAGE, PROMPT_TOO_LARGE_MESSAGE,
};
use crate::context::ContextDocument;
use crate::llm::{CompletionRequest, LlmError, LlmProvider};
use crate::prompt::PromptEnvelope;
use crate::sanitizer::strip_sentinels;

/// Fixed per-deployment generation options
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOptions {
    /// Provider-side model identifier
    pub model_id: String,
    /// Name used in the assistant persona
    pub owner_name: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token cap
    pub max_tokens: u32,
    /// Envelopes estimated above this size are rejected before the call
    pub max_prompt_tokens: usize,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_CHAT_MODEL_ID.to_string(),
            owner_name: "the candidate".to_string(),
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
            max_prompt_tokens: DEFAULT_MAX_PROMPT_TOKENS,
        }
    }
}

impl From<&RelaySettings> for AnswerOptions {
    fn from(settings: &RelaySettings) -> Self {
        Self {
            model_id: settings.chat_model_id.clone(),
            owner_name: settings.cv_owner_name.clone(),
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
            max_prompt_tokens: settings.max_prompt_tokens,
        }
    }
}

/// Answers questions about the context document through an LLM provider
pub struct AnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    context: Arc<ContextDocument>,
    options: AnswerOptions,
}

impl AnswerGenerator {
    /// Create a generator bound to one provider and one document
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        context: Arc<ContextDocument>,
        options: AnswerOptions,
    ) -> Self {
        Self {
            provider,
            context,
            options,
        }
    }

    /// Generation options in use
    #[must_use]
    pub const fn options(&self) -> &AnswerOptions {
        &self.options
    }

    /// Compose the request for `question` without sending it
    #[must_use]
    pub fn envelope(&self, question: &str) -> PromptEnvelope {
        PromptEnvelope::compose(&self.options.owner_name, &self.context, question)
    }

    /// Answer a question, propagating provider failures.
    ///
    /// Sentinel markers are stripped and an empty result is replaced with
    /// [`FALLBACK_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Returns `LlmError::PromptTooLarge` if the envelope exceeds the token
    /// limit (the provider is not called), or any error from the provider.
    pub async fn try_answer(&self, question: &str) -> Result<String, LlmError> {
        let envelope = self.envelope(question);

        let tokens = envelope.token_estimate();
        if tokens > self.options.max_prompt_tokens {
            return Err(LlmError::PromptTooLarge {
                tokens,
                limit: self.options.max_prompt_tokens,
            });
        }

        let request = CompletionRequest {
            model_id: self.options.model_id.clone(),
            system_prompt: envelope.system,
            user_prompt: envelope.user,
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        debug!(
            model = %request.model_id,
            prompt_tokens = tokens,
            "Sending request to LLM"
        );

        let start = Instant::now();
        let raw = self.provider.complete(&request).await?;
        debug!(
            model = %request.model_id,
            duration_ms = start.elapsed().as_millis(),
            chars = raw.chars().count(),
            "Received success response from LLM"
        );

        let cleaned = strip_sentinels(&raw).trim().to_string();
        if cleaned.is_empty() {
            warn!(model = %request.model_id, "LLM returned an empty answer, using fallback");
            return Ok(FALLBACK_MESSAGE.to_string());
        }
        Ok(cleaned)
    }

    /// Answer a question. Never fails.
    ///
    /// Provider errors map to [`FALLBACK_MESSAGE`], an oversized prompt maps
    /// to [`PROMPT_TOO_LARGE_MESSAGE`].
    pub async fn answer(&self, question: &str) -> String {
        match self.try_answer(question).await {
            Ok(answer) => answer,
            Err(e @ LlmError::PromptTooLarge { .. }) => {
                warn!(kind = e.kind(), error = %e, "Question rejected before generation");
                PROMPT_TOO_LARGE_MESSAGE.to_string()
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Answer generation failed");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}
