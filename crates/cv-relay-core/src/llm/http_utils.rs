//! HTTP utilities for LLM providers
//!
//! Request sending and response decoding shared by the raw-HTTP providers.

use crate::llm::LlmError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Maximum length of a provider error body kept in `LlmError::ApiError`
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Creates an HTTP client with the given request timeout.
#[must_use]
pub fn create_http_client(timeout_secs: u64) -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Sends an HTTP POST request with JSON body and returns parsed JSON response.
///
/// # Errors
///
/// Returns `LlmError::NetworkError` on connectivity issues,
/// `LlmError::RateLimit` on 429, `LlmError::ApiError` on other non-success
/// status codes, or `LlmError::JsonError` if parsing fails.
pub async fn send_json_request(
    client: &HttpClient,
    url: &str,
    body: &Value,
    auth_header: Option<&str>,
    extra_headers: &[(&str, &str)],
) -> Result<Value, LlmError> {
    let mut request = client.post(url).json(body);

    if let Some(auth) = auth_header {
        request = request.header("Authorization", auth);
    }

    for (key, value) in extra_headers {
        request = request.header(*key, *value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| LlmError::NetworkError(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let wait_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let message = response.text().await.unwrap_or_default();
        return Err(LlmError::RateLimit {
            wait_secs,
            message: clean_error_body(&message),
        });
    }

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError(format!(
            "API error: {status} - {}",
            clean_error_body(&error_text)
        )));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::JsonError(e.to_string()))
}

/// Keep error bodies short and free of proxy HTML pages.
fn clean_error_body(text: &str) -> String {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<html") || trimmed.starts_with("<HTML") {
        return "(Server returned HTML error page)".to_string();
    }
    if text.chars().count() > MAX_ERROR_BODY_CHARS {
        return format!(
            "{}... (truncated)",
            crate::utils::truncate_str(text, MAX_ERROR_BODY_CHARS)
        );
    }
    text.to_string()
}

/// Extracts the assistant message text from an OpenAI-style chat response.
///
/// A present choice with `null` or missing content yields an empty string;
/// the caller decides what an empty generation means.
///
/// # Errors
///
/// Returns `LlmError::ApiError` if the body carries an `error` object,
/// `LlmError::EmptyResponse` if there is no first choice, and
/// `LlmError::JsonError` if content has an unexpected type.
pub fn extract_chat_content(response: &Value) -> Result<String, LlmError> {
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), ToString::to_string);
        return Err(LlmError::ApiError(message));
    }

    let choice = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .ok_or(LlmError::EmptyResponse)?;

    match choice.get("message").and_then(|m| m.get("content")) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(LlmError::JsonError(format!(
            "Expected string content, got: {other}"
        ))),
    }
}
