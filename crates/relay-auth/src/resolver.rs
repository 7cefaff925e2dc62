// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential resolution for presented API keys.
//!
//! Resolution order:
//! 1. Key store lookup by key identifier, rejecting revoked/expired records.
//! 2. Fallback to a static, environment-configured legacy key map with
//!    entries of the form `key:secret[:tenantId]`.
//!
//! Resolution is read-only and terminal on failure: there is no silent
//! default tenant.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use relay_core::{KeyStore, RelayError, ResolvedIdentity};
use tracing::{debug, warn};

/// Scope granted to identities resolved from the legacy static map.
const LEGACY_SCOPE: &str = "relay";

/// One parsed static key entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StaticKey {
    key_id: String,
    tenant_id: String,
}

/// Resolves presented API keys to tenant identities.
pub struct CredentialResolver {
    key_store: Arc<dyn KeyStore>,
    /// Presented secret -> legacy identity.
    static_keys: HashMap<String, StaticKey>,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("static_keys", &self.static_keys.len())
            .finish()
    }
}

impl CredentialResolver {
    /// Build a resolver over a key store with no legacy map.
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        Self {
            key_store,
            static_keys: HashMap::new(),
        }
    }

    /// Add legacy/dev entries of the form `key:secret[:tenantId]`.
    ///
    /// Callers present the `secret` part. When the tenant segment is
    /// absent, the `key` part doubles as the tenant id. Malformed entries
    /// are skipped with a warning rather than failing startup.
    pub fn with_static_entries(mut self, entries: &[String]) -> Self {
        for entry in entries {
            let mut parts = entry.splitn(3, ':');
            let (key, secret, tenant) = (parts.next(), parts.next(), parts.next());
            match (key, secret) {
                (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                    self.static_keys.insert(
                        secret.to_string(),
                        StaticKey {
                            key_id: key.to_string(),
                            tenant_id: tenant.unwrap_or(key).to_string(),
                        },
                    );
                }
                _ => {
                    warn!(entry, "skipping malformed static key entry");
                }
            }
        }
        self
    }

    /// Resolve a presented key string, or fail with `Unauthorized`.
    pub async fn resolve(&self, presented: &str) -> Result<ResolvedIdentity, RelayError> {
        if presented.is_empty() {
            return Err(RelayError::Unauthorized("missing API key".into()));
        }

        if let Some(record) = self.key_store.fetch_key(presented).await? {
            if !record.is_usable(Utc::now()) {
                warn!(key_id = %record.key_id, "rejected revoked or expired API key");
                return Err(RelayError::Unauthorized("key revoked or expired".into()));
            }
            debug!(tenant = %record.tenant_id, "resolved key via key store");
            return Ok(ResolvedIdentity {
                tenant_id: record.tenant_id,
                bot_id: record.bot_id,
                scopes: record.scopes,
            });
        }

        if let Some(entry) = self.static_keys.get(presented) {
            debug!(key_id = %entry.key_id, "resolved key via legacy static map");
            return Ok(ResolvedIdentity {
                tenant_id: entry.tenant_id.clone(),
                bot_id: None,
                scopes: vec![LEGACY_SCOPE.to_string()],
            });
        }

        Err(RelayError::Unauthorized("unknown API key".into()))
    }
}
