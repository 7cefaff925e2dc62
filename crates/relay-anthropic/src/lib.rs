// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Messages API adapter for the relay intent classifier.

pub mod client;
pub mod types;

pub use client::{AnthropicClassifier, ClientOptions};
