// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the relay decision engine.

use thiserror::Error;

/// The primary error type used across relay trait seams and core operations.
///
/// Only `Unauthorized` and `InvalidEvent` ever surface to a caller as a
/// request failure; everything else is either recovered inside the pipeline
/// (provider failures, reporting failures) or indicates a broken deployment.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The presented API key is missing, unknown, revoked, or expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The inbound event is structurally unusable (e.g. no resolvable bot id).
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Collaborator store errors (key store, config store, catalog lookups).
    #[error("store error: {message}")]
    Store {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// LLM provider errors (API failure, unparseable body, rate limiting).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Gateway transport errors (bind failure, serve failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A bounded external call exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Wrap an arbitrary store failure with context.
    pub fn store(message: impl Into<String>) -> Self {
        RelayError::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary provider failure with context.
    pub fn provider(message: impl Into<String>) -> Self {
        RelayError::Provider {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let e = RelayError::Unauthorized("key revoked".into());
        assert_eq!(e.to_string(), "unauthorized: key revoked");

        let e = RelayError::store("config lookup failed");
        assert_eq!(e.to_string(), "store error: config lookup failed");

        let e = RelayError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        assert!(e.to_string().contains("10s"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RelayError>();
    }
}
