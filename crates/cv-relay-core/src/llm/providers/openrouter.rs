use crate::llm::http_utils::{create_http_client, extract_chat_content, send_json_request};
use crate::llm::{CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// LLM provider implementation for `OpenRouter`
pub struct OpenRouterProvider {
    http_client: HttpClient,
    api_key: String,
    api_base: String,
    site_url: String,
    site_name: String,
}

impl OpenRouterProvider {
    /// Create a new `OpenRouter` provider instance
    #[must_use]
    pub fn new(
        api_key: String,
        api_base: String,
        site_url: String,
        site_name: String,
        timeout_secs: u64,
    ) -> Self {
        Self {
            http_client: create_http_client(timeout_secs),
            api_key,
            api_base,
            site_url,
            site_name,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    /// JSON body for a chat completion request
    #[must_use]
    pub fn request_body(request: &CompletionRequest) -> Value {
        json!({
            "model": request.model_id,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_prompt}
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature
        })
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    #[instrument(skip_all, fields(model = %request.model_id))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = Self::request_body(request);

        let mut extra_headers = Vec::new();
        if !self.site_url.is_empty() {
            extra_headers.push(("HTTP-Referer", self.site_url.as_str()));
        }
        if !self.site_name.is_empty() {
            extra_headers.push(("X-Title", self.site_name.as_str()));
        }

        let auth = format!("Bearer {}", self.api_key);
        let res_json = send_json_request(
            &self.http_client,
            &self.completions_url(),
            &body,
            Some(&auth),
            &extra_headers,
        )
        .await?;

        debug!(
            finish_reason = res_json["choices"][0]["finish_reason"]
                .as_str()
                .unwrap_or("unknown"),
            total_tokens = res_json["usage"]["total_tokens"].as_u64().unwrap_or(0),
            "OpenRouter response received"
        );

        extract_chat_content(&res_json)
    }
}
