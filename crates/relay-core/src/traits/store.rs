// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side store seams for the out-of-scope persistence service.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::{ApiKeyRecord, BotConfiguration, BotPersona, CommandMapping};

/// Lookup of stored API key records by key identifier.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Fetch the record for a presented key, or `None` when unknown.
    ///
    /// Usability (revocation, expiry) is the resolver's job, not the store's.
    async fn fetch_key(&self, key_id: &str) -> Result<Option<ApiKeyRecord>, RelayError>;
}

/// Lookup of per-bot configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the configuration for a bot, creating the default row on first
    /// read when none exists yet.
    async fn load_or_init(&self, bot_id: &str) -> Result<BotConfiguration, RelayError>;
}

/// Lookup of the active command-mapping catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All `active` mappings for a bot, in catalog order.
    async fn active_mappings(
        &self,
        tenant_id: &str,
        bot_id: &str,
    ) -> Result<Vec<CommandMapping>, RelayError>;
}

/// Lookup of bot personas for prompt construction.
#[async_trait]
pub trait PersonaStore: Send + Sync {
    /// The persona for a bot, or `None` when the owner never set one.
    async fn persona(&self, bot_id: &str) -> Result<Option<BotPersona>, RelayError>;
}
