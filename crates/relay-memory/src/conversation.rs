// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, scoped conversation memory.
//!
//! Turns are kept in per-scope ring buffers capped at the most recent
//! [`MAX_TURNS`] entries. Two scope granularities exist per bot: bot-wide
//! `(channel, bot)` and user-within-bot `(channel, bot, user)`. Reads prefer
//! the user scope when it has content; appends go to both scopes so the
//! bot-wide buffer stays a superset usable for callers without a user id.
//!
//! Eviction is count-based only. There is deliberately no wall-clock TTL on
//! memory; a time-based cap would be a backend concern of an alternative
//! [`ConversationStore`] implementation.

use std::collections::VecDeque;

use async_trait::async_trait;
use dashmap::DashMap;
use relay_core::ConversationTurn;

/// Maximum turns retained per scope; appending beyond this evicts the oldest.
pub const MAX_TURNS: usize = 8;

/// A composite key partitioning conversation memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Bot-wide scope: all traffic for a bot in one channel.
    pub fn bot(channel_id: &str, bot_id: &str) -> Self {
        Self(format!("{channel_id}:{bot_id}"))
    }

    /// User scope: one user's exchange with a bot in one channel.
    pub fn user(channel_id: &str, bot_id: &str, user_id: &str) -> Self {
        Self(format!("{channel_id}:{bot_id}:{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Injectable conversation memory seam.
///
/// The in-process implementation below is the reference behavior; a
/// horizontally scaled deployment would back this with a shared cache so
/// every instance observes the same context.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append a turn to one scope, trimming to the last [`MAX_TURNS`].
    async fn append(&self, scope: &ScopeKey, turn: ConversationTurn);

    /// All retained turns for a scope, oldest first. Empty when unknown.
    async fn read(&self, scope: &ScopeKey) -> Vec<ConversationTurn>;
}

/// Process-local conversation memory over a concurrent map.
///
/// Same-scope concurrent appends are last-write-wins on the ring buffer,
/// which is the accepted approximation from the reference behavior.
#[derive(Debug, Default)]
pub struct InMemoryConversations {
    scopes: DashMap<ScopeKey, VecDeque<ConversationTurn>>,
}

impl InMemoryConversations {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversations {
    async fn append(&self, scope: &ScopeKey, turn: ConversationTurn) {
        let mut buffer = self.scopes.entry(scope.clone()).or_default();
        buffer.push_back(turn);
        while buffer.len() > MAX_TURNS {
            buffer.pop_front();
        }
    }

    async fn read(&self, scope: &ScopeKey) -> Vec<ConversationTurn> {
        self.scopes
            .get(scope)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Read context for an event: the user scope when present and non-empty,
/// falling back to the bot-wide scope.
pub async fn read_preferred(
    store: &dyn ConversationStore,
    channel_id: &str,
    bot_id: &str,
    user_id: Option<&str>,
) -> Vec<ConversationTurn> {
    if let Some(user) = user_id {
        let turns = store.read(&ScopeKey::user(channel_id, bot_id, user)).await;
        if !turns.is_empty() {
            return turns;
        }
    }
    store.read(&ScopeKey::bot(channel_id, bot_id)).await
}
