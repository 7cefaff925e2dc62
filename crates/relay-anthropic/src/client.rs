// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API, exposed to the engine as a
//! [`ClassifierProvider`].
//!
//! Non-streaming only. Retries on 429 with a short delay; every other
//! failure is surfaced immediately so the engine's keyword fallback can
//! take over.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::{ClassifierProvider, ClassifyRequest, RelayError};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ApiMessage, MessageRequest, MessageResponse};

/// Base URL for the Anthropic Messages API.
const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Delay before a retry after a 429.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Settings for [`AnthropicClassifier`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_key: String,
    pub api_version: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    /// Retries after a 429 before giving up.
    pub max_retries: u32,
}

/// Classifier provider backed by the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClassifier {
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
    max_retries: u32,
    base_url: String,
}

impl AnthropicClassifier {
    pub fn new(options: ClientOptions) -> Result<Self, RelayError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&options.api_key)
                .map_err(|e| RelayError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&options.api_version).map_err(|e| {
                RelayError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| RelayError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model: options.model,
            max_tokens: options.max_tokens,
            max_retries: options.max_retries,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Model identifier this classifier calls.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn complete(&self, request: &MessageRequest) -> Result<MessageResponse, RelayError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying classification request after rate limit");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| RelayError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "classification response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| RelayError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| RelayError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            // Only rate limiting is worth a retry here; a classification is
            // cheap to redo via the engine's fallback, so 5xx fails fast.
            if status.as_u16() == 429 && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "rate limited, will retry");
                last_error = Some(RelayError::provider(format!("API returned {status}: {body}")));
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Anthropic API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(RelayError::provider(message));
        }

        Err(last_error
            .unwrap_or_else(|| RelayError::provider("classification request failed after retries")))
    }
}

#[async_trait]
impl ClassifierProvider for AnthropicClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<String, RelayError> {
        let api_request = MessageRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: request.user.clone(),
            }],
            system: Some(request.system.clone()),
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self.complete(&api_request).await?;
        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> AnthropicClassifier {
        AnthropicClassifier::new(ClientOptions {
            api_key: "test-api-key".into(),
            api_version: "2023-06-01".into(),
            model: "claude-haiku-4-5-20250901".into(),
            max_tokens: 1024,
            request_timeout: Duration::from_secs(5),
            max_retries: 1,
        })
        .unwrap()
        .with_base_url(base_url.to_string())
    }

    fn test_request() -> ClassifyRequest {
        ClassifyRequest {
            system: "You classify messages.".into(),
            user: "Message: ban him".into(),
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "msg_test",
            "content": [{"type": "text", "text": text}],
            "model": "claude-haiku-4-5-20250901",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        })
    }

    #[tokio::test]
    async fn classify_returns_response_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(r#"{"isCommand": false}"#)))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.classify(&test_request()).await.unwrap();
        assert_eq!(text, r#"{"isCommand": false}"#);
    }

    #[tokio::test]
    async fn classify_retries_on_429() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"type": "rate_limit_error", "message": "Rate limited"}
        });

        // First request returns 429, second returns 200.
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("after retry")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.classify(&test_request()).await.unwrap();
        assert_eq!(text, "after retry");
    }

    #[tokio::test]
    async fn classify_fails_fast_on_400() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"type": "invalid_request_error", "message": "Bad model"}
        });

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.classify(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("invalid_request_error"), "got: {err}");
    }

    #[tokio::test]
    async fn classify_does_not_retry_on_503() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"type": "overloaded_error", "message": "Service overloaded"}
        });

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(&error_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.classify(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("overloaded_error"), "got: {err}");
    }

    #[tokio::test]
    async fn classify_exhausts_retries_on_persistent_429() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"type": "rate_limit_error", "message": "Rate limited"}
        });

        // Both attempts return 429.
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.classify(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("rate_limit_error"), "got: {err}");
    }
}
