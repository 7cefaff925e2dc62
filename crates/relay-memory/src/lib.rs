// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local stateful stores for the relay decision engine: scoped
//! conversation memory and the idempotency guard.
//!
//! Both are behind trait seams ([`ConversationStore`], [`DecisionCache`]) so
//! a scaled deployment can swap in a shared cache without touching the
//! pipeline.

pub mod conversation;
pub mod idempotency;

pub use conversation::{
    read_preferred, ConversationStore, InMemoryConversations, ScopeKey, MAX_TURNS,
};
pub use idempotency::{DecisionCache, InMemoryDecisionCache, DEFAULT_TTL};
