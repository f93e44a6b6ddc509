use std::time::Duration;

use async_trait::async_trait;
use colloquy_core::{CompletionError, CompletionService, Message};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::retry::{RetryPolicy, retry_with_backoff};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat completions over Groq's OpenAI-compatible API.
pub struct GroqProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl GroqProvider {
    /// Create a provider with default settings.
    ///
    /// A blank API key fails with [`CompletionError::Authentication`] before
    /// any request is made.
    pub fn new(api_key: impl Into<String>) -> Result<Self, CompletionError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CompletionError::Authentication(
                "API key is not set".to_string(),
            ));
        }

        info!("Creating GroqProvider");
        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, CompletionError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(&self, messages: &[Message]) -> Value {
        let messages: Vec<Value> = messages.iter().map(Message::to_api_format).collect();
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    /// Helper method to send a single request
    async fn try_send(&self, request: &Value) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| CompletionError::Transport(format!("Invalid response body: {e}")))?;
        parse_completion(&value)
    }
}

#[async_trait]
impl CompletionService for GroqProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        if messages.is_empty() {
            return Err(CompletionError::InvalidRequest(
                "at least one message is required".to_string(),
            ));
        }

        let request = self.request_body(messages);
        info!(
            "Sending request to Groq API: model={}, messages={}",
            self.model,
            messages.len()
        );

        let content = retry_with_backoff(|| self.try_send(&request), &self.retry).await?;

        info!("Received response from Groq API");
        Ok(content)
    }
}

fn build_client(timeout: Duration) -> Result<Client, CompletionError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CompletionError::Transport(format!("Failed to build HTTP client: {e}")))
}

/// Map a non-success HTTP status to the error taxonomy.
///
/// Client errors other than auth and rate limiting are permanent and end up
/// as `InvalidRequest`; server errors stay retryable.
fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    let message = if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {detail}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionError::Authentication(message)
        }
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimit(message),
        s if s.is_client_error() => CompletionError::InvalidRequest(message),
        _ => CompletionError::Transport(message),
    }
}

/// Pull the first choice's content out of a chat completion body.
fn parse_completion(response: &Value) -> Result<String, CompletionError> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            CompletionError::Transport("Invalid response format: missing content".to_string())
        })?
        .to_string();

    if let Some(usage) = response["usage"].as_object() {
        let tokens = |key: &str| usage.get(key).and_then(serde_json::Value::as_u64).unwrap_or(0);
        let (prompt, completion, total) = (
            tokens("prompt_tokens"),
            tokens("completion_tokens"),
            tokens("total_tokens"),
        );
        debug!("Token usage: prompt={prompt}, completion={completion}, total={total}");
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_rejected() {
        assert!(matches!(
            GroqProvider::new("   "),
            Err(CompletionError::Authentication(_))
        ));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_request_body_shape() {
        let provider = GroqProvider::new("gsk_test")
            .expect("key is set")
            .with_model("llama-3.3-70b-versatile")
            .with_max_tokens(256);
        let messages = vec![
            Message::system("Be brief.").expect("valid"),
            Message::user("Hello").expect("valid"),
        ];

        let body = provider.request_body(&messages);

        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert!(body["messages"][1].get("timestamp").is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_base_url_trailing_slash() {
        let provider = GroqProvider::new("gsk_test")
            .expect("key is set")
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_classify_status() {
        let body = r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#;
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, body),
            CompletionError::Authentication("401 Unauthorized: Invalid API Key".to_string())
        );
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            CompletionError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            CompletionError::RateLimit(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "<html>"),
            CompletionError::Transport(_)
        ));
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let body = r#"{"error": {"message": "The model `llama-9` does not exist", "code": "model_not_found"}}"#;
        let not_found = classify_status(StatusCode::NOT_FOUND, body);
        assert_eq!(
            not_found,
            CompletionError::InvalidRequest(
                "404 Not Found: The model `llama-9` does not exist".to_string()
            )
        );
        assert!(!not_found.is_retryable());

        let bad_request = classify_status(StatusCode::BAD_REQUEST, "");
        assert_eq!(
            bad_request,
            CompletionError::InvalidRequest("400 Bad Request".to_string())
        );
        assert!(!bad_request.is_retryable());

        assert!(classify_status(StatusCode::SERVICE_UNAVAILABLE, "").is_retryable());
    }

    #[test]
    fn test_parse_completion() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hi there"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        });
        assert_eq!(parse_completion(&response), Ok("Hi there".to_string()));

        let malformed = json!({"choices": []});
        assert!(matches!(
            parse_completion(&malformed),
            Err(CompletionError::Transport(_))
        ));
    }
}
