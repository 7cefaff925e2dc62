// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams for every effectful collaborator of the pipeline.
//!
//! The engine never talks to a database, billing service, or LLM provider
//! directly; it goes through these traits so tests can inject doubles and a
//! deployment can back them with whatever service actually holds the data.

pub mod provider;
pub mod store;
pub mod usage;

pub use provider::{ClassifierProvider, ClassifyRequest};
pub use store::{CatalogStore, ConfigStore, KeyStore, PersonaStore};
pub use usage::UsageSink;
