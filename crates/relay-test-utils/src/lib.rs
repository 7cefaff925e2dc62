// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic test doubles for the relay workspace: a canned-response
//! classification provider with call counting, in-memory collaborator
//! stores, and a recording usage sink.

pub mod mock_provider;
pub mod mock_stores;

pub use mock_provider::MockClassifier;
pub use mock_stores::{CountingUsageSink, MockCatalog, MockConfigStore, MockKeyStore};
