// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider seam for the external language-model classification call.

use async_trait::async_trait;

use crate::error::RelayError;

/// A single classification request: system prompt plus user content.
///
/// The provider adapter maps this onto whatever request shape its API
/// expects; the classifier only cares about getting raw text back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyRequest {
    /// System prompt: persona, command catalog, output-format instructions.
    pub system: String,
    /// User content: recent context plus the message under classification.
    pub user: String,
}

/// The effectful LLM boundary.
///
/// One call per natural-language classification. The returned text is
/// expected to contain a JSON object but is treated as untrusted: the
/// classifier extracts and parses it defensively, and any failure here is a
/// classification failure, never a request failure.
#[async_trait]
pub trait ClassifierProvider: Send + Sync {
    /// Perform one classification call and return the raw response text.
    async fn classify(&self, request: &ClassifyRequest) -> Result<String, RelayError>;
}
