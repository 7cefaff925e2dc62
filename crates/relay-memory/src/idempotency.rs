// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-TTL idempotency guard.
//!
//! Maps a client-supplied idempotency key to the previously emitted
//! [`Decision`]. A hit short-circuits the whole pipeline and replays the
//! stored decision verbatim, original id included, giving at-most-one
//! semantic outcome per key within the TTL window.
//!
//! Expired entries are purged lazily on lookup, not proactively.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use relay_core::Decision;
use tracing::debug;

/// Entries older than this are treated as absent.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Injectable decision cache seam.
#[async_trait]
pub trait DecisionCache: Send + Sync {
    /// The stored decision for a key, if one exists and has not expired.
    async fn lookup(&self, key: &str) -> Option<Decision>;

    /// Store a decision under a key, resetting its TTL window.
    async fn store(&self, key: &str, decision: Decision);
}

/// Process-local decision cache over a concurrent map.
#[derive(Debug)]
pub struct InMemoryDecisionCache {
    entries: DashMap<String, (Decision, Instant)>,
    ttl: Duration,
}

impl InMemoryDecisionCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// A cache with a custom TTL, mainly for tests.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }
}

impl Default for InMemoryDecisionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionCache for InMemoryDecisionCache {
    async fn lookup(&self, key: &str) -> Option<Decision> {
        if let Some(entry) = self.entries.get(key) {
            let (decision, inserted_at) = entry.value();
            if inserted_at.elapsed() < self.ttl {
                debug!(key, decision_id = %decision.id, "idempotency hit");
                return Some(decision.clone());
            }
        } else {
            return None;
        }
        // Expired: purge lazily and report absent.
        self.entries.remove(key);
        debug!(key, "idempotency entry expired");
        None
    }

    async fn store(&self, key: &str, decision: Decision) {
        self.entries
            .insert(key.to_string(), (decision, Instant::now()));
    }
}
