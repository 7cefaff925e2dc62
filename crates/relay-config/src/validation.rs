// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde attributes cannot express, such as
//! bind address shape, static key format and seed table consistency.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::RelayConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects all errors rather than failing fast.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.engine.classify_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.classify_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.engine.decision_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.decision_ttl_secs must be at least 1".to_string(),
        });
    }

    if config.anthropic.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "anthropic.max_tokens must be at least 1".to_string(),
        });
    }

    // Static keys are `keyId:secret` or `keyId:secret:tenantId`.
    for (i, entry) in config.auth.static_keys.iter().enumerate() {
        let parts: Vec<&str> = entry.split(':').collect();
        let well_formed =
            (2..=3).contains(&parts.len()) && parts.iter().all(|p| !p.trim().is_empty());
        if !well_formed {
            errors.push(ConfigError::Validation {
                message: format!(
                    "auth.static_keys[{i}] must be `keyId:secret` or `keyId:secret:tenantId`"
                ),
            });
        }
    }

    if let Some(endpoint) = &config.usage.endpoint
        && !endpoint.starts_with("http://")
        && !endpoint.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!("usage.endpoint `{endpoint}` must be an http(s) URL"),
        });
    }

    let mut seen_bots = HashSet::new();
    for (i, bot) in config.bots.iter().enumerate() {
        if bot.bot_id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("bots[{i}].bot_id must not be empty"),
            });
        } else if !seen_bots.insert(&bot.bot_id) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate bot_id `{}` in [[bots]] array", bot.bot_id),
            });
        }
    }

    let mut seen_mappings = HashSet::new();
    for (i, mapping) in config.mappings.iter().enumerate() {
        if mapping.id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("mappings[{i}].id must not be empty"),
            });
        } else if !seen_mappings.insert(&mapping.id) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate mapping id `{}` in [[mappings]] array", mapping.id),
            });
        }
        if mapping.bot_id.trim().is_empty() || mapping.tenant_id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("mappings[{i}] must set both bot_id and tenant_id"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
