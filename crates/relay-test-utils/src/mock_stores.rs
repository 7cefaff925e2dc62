// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store doubles for the out-of-scope persistence and metering
//! collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use relay_core::{
    ApiKeyRecord, BotConfiguration, BotPersona, CatalogStore, CommandMapping, ConfigStore,
    KeyStore, MappingStatus, PersonaStore, RelayError, UsageReport, UsageSink,
};
use tokio::sync::Mutex;

/// Key store over a fixed map of records.
#[derive(Default)]
pub struct MockKeyStore {
    keys: HashMap<String, ApiKeyRecord>,
}

impl MockKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, record: ApiKeyRecord) -> Self {
        self.keys.insert(record.key_id.clone(), record);
        self
    }
}

#[async_trait]
impl KeyStore for MockKeyStore {
    async fn fetch_key(&self, key_id: &str) -> Result<Option<ApiKeyRecord>, RelayError> {
        Ok(self.keys.get(key_id).cloned())
    }
}

/// Config store that creates default rows lazily, like the real service.
#[derive(Default)]
pub struct MockConfigStore {
    configs: Mutex<HashMap<String, BotConfiguration>>,
}

impl MockConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(self, config: BotConfiguration) -> Self {
        self.configs
            .try_lock()
            .expect("unshared at construction")
            .insert(config.bot_id.clone(), config);
        self
    }

    /// Number of stored rows, for lazy-creation assertions.
    pub async fn len(&self) -> usize {
        self.configs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ConfigStore for MockConfigStore {
    async fn load_or_init(&self, bot_id: &str) -> Result<BotConfiguration, RelayError> {
        let mut configs = self.configs.lock().await;
        Ok(configs
            .entry(bot_id.to_string())
            .or_insert_with(|| BotConfiguration::defaults_for(bot_id))
            .clone())
    }
}

/// Catalog and persona store over fixed data.
#[derive(Default)]
pub struct MockCatalog {
    mappings: Vec<CommandMapping>,
    personas: HashMap<String, BotPersona>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, mapping: CommandMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn with_persona(mut self, persona: BotPersona) -> Self {
        self.personas.insert(persona.bot_id.clone(), persona);
        self
    }

    /// Convenience constructor for an active mapping.
    pub fn mapping(id: &str, bot_id: &str, name: &str, pattern: &str, template: &str) -> CommandMapping {
        CommandMapping {
            id: id.into(),
            tenant_id: "tenant-1".into(),
            bot_id: bot_id.into(),
            name: name.into(),
            pattern: pattern.into(),
            template: template.into(),
            status: MappingStatus::Active,
            usage_count: 0,
        }
    }
}

#[async_trait]
impl CatalogStore for MockCatalog {
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
                    && m.status == MappingStatus::Active
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PersonaStore for MockCatalog {
    async fn persona(&self, bot_id: &str) -> Result<Option<BotPersona>, RelayError> {
        Ok(self.personas.get(bot_id).cloned())
    }
}

/// Usage sink that records every report.
#[derive(Default)]
pub struct CountingUsageSink {
    reports: Mutex<Vec<UsageReport>>,
    count: AtomicUsize,
}

impl CountingUsageSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub async fn reports(&self) -> Vec<UsageReport> {
        self.reports.lock().await.clone()
    }
}

#[async_trait]
impl UsageSink for CountingUsageSink {
    async fn report(&self, report: &UsageReport) -> Result<(), RelayError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.reports.lock().await.push(report.clone());
        Ok(())
    }
}
