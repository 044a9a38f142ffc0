//! OpenAI-compatible provider
//!
//! Uses the async-openai client against any compatible base URL
//! (`OpenRouter` itself, a local gateway, or OpenAI).

use super::{CompletionRequest, LlmError, LlmProvider};
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use tracing::instrument;

/// LLM provider for OpenAI-compatible APIs
pub struct OpenAiCompatProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompatProvider {
    /// Create a new provider for the given base URL
    #[must_use]
    pub fn new(api_key: String, api_base: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
        }
    }
}

/// Build the system + user message pair
fn build_messages(
    request: &CompletionRequest,
) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
    Ok(vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_prompt.as_str())
            .build()
            .map_err(|e| LlmError::Unknown(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_prompt.as_str())
            .build()
            .map_err(|e| LlmError::Unknown(e.to_string()))?
            .into(),
    ])
}

/// Text of the first choice; `None` content counts as an empty generation
fn extract_response(response: &CreateChatCompletionResponse) -> Result<String, LlmError> {
    response
        .choices
        .first()
        .map(|c| c.message.content.clone().unwrap_or_default())
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    #[instrument(skip_all, fields(model = %request.model_id))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(request.model_id.as_str())
            .messages(build_messages(request)?)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
            .map_err(|e| LlmError::Unknown(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| LlmError::ApiError(e.to_string()))?;

        extract_response(&response)
    }
}
