// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config-seeded standalone collaborators.
//!
//! The persistence and metering services behind the engine's trait seams
//! are out of scope for this daemon; these implementations let a single
//! relayd run from nothing but `relay.toml`.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use relay_core::{
    ApiKeyRecord, BotConfiguration, BotPersona, CatalogStore, CommandMapping, ConfigStore,
    KeyStore, PersonaStore, RelayError, UsageReport, UsageSink,
};
use tracing::{debug, warn};

/// Key store with no backing service. Resolution falls through to the
/// static key map configured on the resolver.
pub struct NullKeyStore;

#[async_trait]
impl KeyStore for NullKeyStore {
    async fn fetch_key(&self, _key_id: &str) -> Result<Option<ApiKeyRecord>, RelayError> {
        Ok(None)
    }
}

/// Per-bot configuration store seeded from `[[bots]]`, with lazy default
/// rows for bots the file does not mention.
pub struct SeededConfigStore {
    configs: DashMap<String, BotConfiguration>,
}

impl SeededConfigStore {
    pub fn new(seeds: &[BotConfiguration]) -> Self {
        let configs = DashMap::new();
        for seed in seeds {
            configs.insert(seed.bot_id.clone(), seed.clone());
        }
        Self { configs }
    }
}

#[async_trait]
impl ConfigStore for SeededConfigStore {
    async fn load_or_init(&self, bot_id: &str) -> Result<BotConfiguration, RelayError> {
        let config = self
            .configs
            .entry(bot_id.to_string())
            .or_insert_with(|| {
                debug!(bot_id, "creating default bot configuration");
                BotConfiguration::defaults_for(bot_id)
            })
            .clone();
        Ok(config)
    }
}

/// Command catalog and persona store seeded from `[[mappings]]` and
/// `[[personas]]`.
pub struct SeededCatalog {
    mappings: Vec<CommandMapping>,
    personas: HashMap<String, BotPersona>,
}

impl SeededCatalog {
    pub fn new(mappings: &[CommandMapping], personas: &[BotPersona]) -> Self {
        Self {
            mappings: mappings.to_vec(),
            personas: personas
                .iter()
                .map(|p| (p.bot_id.clone(), p.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl CatalogStore for SeededCatalog {
    async fn active_mappings(
        &self,
        tenant_id: &str,
        bot_id: &str,
    ) -> Result<Vec<CommandMapping>, RelayError> {
        Ok(self
            .mappings
            .iter()
            .filter(|m| {
                m.tenant_id == tenant_id
                    && m.bot_id == bot_id
                    && m.status == relay_core::MappingStatus::Active
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PersonaStore for SeededCatalog {
    async fn persona(&self, bot_id: &str) -> Result<Option<BotPersona>, RelayError> {
        Ok(self.personas.get(bot_id).cloned())
    }
}

/// Usage sink that POSTs reports to a configured endpoint.
pub struct HttpUsageSink {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl HttpUsageSink {
    pub fn new(endpoint: String, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            auth_token,
        }
    }
}

#[async_trait]
impl UsageSink for HttpUsageSink {
    async fn report(&self, report: &UsageReport) -> Result<(), RelayError> {
        let mut request = self.client.post(&self.endpoint).json(report);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| RelayError::Provider {
            message: format!("usage report failed: {e}"),
            source: Some(Box::new(e)),
        })?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "usage endpoint rejected report");
            return Err(RelayError::provider(format!(
                "usage endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Usage sink that only logs. Used when no endpoint is configured.
pub struct NoopUsageSink;

#[async_trait]
impl UsageSink for NoopUsageSink {
    async fn report(&self, report: &UsageReport) -> Result<(), RelayError> {
        debug!(key = %report.key, tenant = %report.tenant_id, "usage report (no sink configured)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{ChannelMode, MappingStatus};

    #[tokio::test]
    async fn seeded_config_prefers_seed_over_defaults() {
        let mut seed = BotConfiguration::defaults_for("b1");
        seed.channel_mode = ChannelMode::Blacklist;
        seed.blocked_channels = vec!["spam".into()];

        let store = SeededConfigStore::new(&[seed]);
        let config = store.load_or_init("b1").await.unwrap();
        assert_eq!(config.channel_mode, ChannelMode::Blacklist);

        // Unseeded bots get lazy defaults.
        let other = store.load_or_init("b2").await.unwrap();
        assert!(other.enabled);
        assert_eq!(other.channel_mode, ChannelMode::All);
    }

    #[tokio::test]
    async fn seeded_catalog_filters_inactive_and_foreign_mappings() {
        let mut active = CommandMapping {
            id: "m1".into(),
            tenant_id: "t1".into(),
            bot_id: "b1".into(),
            name: "ban".into(),
            pattern: "ban a user".into(),
            template: String::new(),
            status: MappingStatus::Active,
            usage_count: 0,
        };
        let mut inactive = active.clone();
        inactive.id = "m2".into();
        inactive.status = MappingStatus::Inactive;
        let mut foreign = active.clone();
        foreign.id = "m3".into();
        foreign.tenant_id = "t2".into();
        active.id = "m1".into();

        let catalog = SeededCatalog::new(&[active, inactive, foreign], &[]);
        let mappings = catalog.active_mappings("t1", "b1").await.unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].id, "m1");
    }

    #[tokio::test]
    async fn null_key_store_never_resolves() {
        let store = NullKeyStore;
        assert!(store.fetch_key("anything").await.unwrap().is_none());
    }
}
