// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for the relay daemon.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a mistyped key is
//! rejected at startup with an actionable diagnostic instead of being
//! silently ignored.

use relay_auth::SignaturePolicy;
use relay_core::{BotConfiguration, BotPersona, CommandMapping};
use serde::{Deserialize, Serialize};

/// Top-level relay configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with `RELAY_`
/// environment variable overrides. Every section is optional and defaults
/// to a runnable standalone setup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Pipeline tuning knobs.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Credential and signature settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Anthropic API settings for the intent classifier.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// HTTP ingress settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Usage metering settings.
    #[serde(default)]
    pub usage: UsageConfig,

    /// Per-bot configuration seeds for standalone mode.
    #[serde(default)]
    pub bots: Vec<BotConfiguration>,

    /// Command catalog seeds for standalone mode.
    #[serde(default)]
    pub mappings: Vec<CommandMapping>,

    /// Persona seeds for standalone mode.
    #[serde(default)]
    pub personas: Vec<BotPersona>,
}

/// Pipeline tuning configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Hard deadline for one classification call, in seconds.
    #[serde(default = "default_classify_timeout_secs")]
    pub classify_timeout_secs: u64,

    /// How long a decision stays replayable under its idempotency key.
    #[serde(default = "default_decision_ttl_secs")]
    pub decision_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            classify_timeout_secs: default_classify_timeout_secs(),
            decision_ttl_secs: default_decision_ttl_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_classify_timeout_secs() -> u64 {
    10
}

fn default_decision_ttl_secs() -> u64 {
    120
}

/// Credential and signature configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Legacy static key entries, each `keyId:secret` or
    /// `keyId:secret:tenantId`. The caller presents the secret part.
    #[serde(default)]
    pub static_keys: Vec<String>,

    /// What to do when a request's body signature does not verify.
    #[serde(default)]
    pub signature_policy: SignaturePolicy,
}

// Static key entries embed secrets; log only their count.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("static_keys", &self.static_keys.len())
            .field("signature_policy", &self.signature_policy)
            .finish()
    }
}

/// Anthropic API configuration for the intent classifier.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for intent classification.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per classification response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries on 429 before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_version", &self.api_version)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

/// HTTP ingress configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

/// Usage metering configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UsageConfig {
    /// Endpoint usage reports are POSTed to. `None` disables reporting.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token sent with usage reports, if the collaborator needs one.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for UsageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageConfig")
            .field("endpoint", &self.endpoint)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
