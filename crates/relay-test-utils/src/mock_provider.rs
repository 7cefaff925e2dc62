// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classification provider for deterministic testing.
//!
//! Responses are popped from a FIFO queue; when it is empty the provider
//! fails, which exercises the keyword fallback. Every call is counted so
//! tests can assert the fast paths really skip the provider.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use relay_core::{ClassifierProvider, ClassifyRequest, RelayError};
use tokio::sync::Mutex;

/// A mock LLM provider with canned raw-text responses and a call counter.
pub struct MockClassifier {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: AtomicUsize,
}

impl MockClassifier {
    /// A provider whose queue is empty: every call fails.
    pub fn failing() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider pre-loaded with successful raw responses.
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(|r| Ok(r.to_string())).collect(),
            )),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue an error outcome.
    pub async fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .await
            .push_back(Err(message.to_string()));
    }

    /// Queue a successful raw response.
    pub async fn push_response(&self, raw: &str) {
        self.responses.lock().await.push_back(Ok(raw.to_string()));
    }

    /// How many classification calls were made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierProvider for MockClassifier {
    async fn classify(&self, _request: &ClassifyRequest) -> Result<String, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().await.pop_front() {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => Err(RelayError::provider(message)),
            None => Err(RelayError::provider("mock queue exhausted")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ClassifyRequest {
        ClassifyRequest {
            system: "s".into(),
            user: "u".into(),
        }
    }

    #[tokio::test]
    async fn responses_pop_in_order_then_fail() {
        let mock = MockClassifier::with_responses(vec!["first", "second"]);
        assert_eq!(mock.classify(&request()).await.unwrap(), "first");
        assert_eq!(mock.classify(&request()).await.unwrap(), "second");
        assert!(mock.classify(&request()).await.is_err());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn queued_errors_are_returned() {
        let mock = MockClassifier::failing();
        mock.push_error("simulated outage").await;
        let err = mock.classify(&request()).await.unwrap_err();
        assert!(err.to_string().contains("simulated outage"));
    }
}
