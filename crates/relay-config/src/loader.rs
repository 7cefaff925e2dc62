// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading via Figment.
//!
//! Merge order: compiled defaults, `/etc/relay/relay.toml`,
//! `~/.config/relay/relay.toml`, `./relay.toml`, then `RELAY_*` environment
//! variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RelayConfig;

/// Load configuration from the standard XDG hierarchy with env overrides.
pub fn load_config() -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file("/etc/relay/relay.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("relay/relay.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("relay.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env overrides.
pub fn load_config_from_path(path: &Path) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `RELAY_*` environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys that themselves
/// contain underscores survive: `RELAY_AUTH_STATIC_KEYS` must map to
/// `auth.static_keys`, not `auth.static.keys`.
fn env_provider() -> Env {
    Env::prefixed("RELAY_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("engine_", "engine.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("usage_", "usage.", 1);
        mapped.into()
    })
}
