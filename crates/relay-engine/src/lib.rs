// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The relay decision pipeline.
//!
//! Takes an authenticated inbound chat event and produces at most one
//! canonical [`Decision`](relay_core::Decision): policy gate, slash
//! fast-path, bounded conversation memory, natural-language classification
//! with conservative fallback, deterministic parameter extraction, decision
//! assembly, idempotent replay and best-effort usage metering.

pub mod classifier;
pub mod decision;
pub mod extract;
pub mod gate;
pub mod pipeline;
pub mod prompt;
pub mod slash;
pub mod usage;
pub mod verdict;

pub use classifier::{Classification, IntentClassifier, CLARIFY_CONFIDENCE, REPLY_CONFIDENCE};
pub use gate::GateOutcome;
pub use pipeline::{
    EngineDeps, EngineOutcome, EngineRequest, RelayEngine, DEFAULT_CLASSIFY_TIMEOUT,
};
pub use slash::SLASH_CONFIDENCE;
pub use verdict::normalize_confidence;
