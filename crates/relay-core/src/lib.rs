// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the relay decision engine.
//!
//! Provides the domain types (inbound events, decisions, key records, bot
//! configuration, command mappings), the shared [`RelayError`] type, and the
//! trait seams every effectful collaborator hides behind. The pipeline lives
//! in `relay-engine`; this crate holds what every other crate agrees on.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RelayError;
pub use types::{
    Action, ApiKeyRecord, BotConfiguration, BotPersona, ChannelMode, CommandMapping,
    ConversationTurn, Decision, InboundEvent, Intent, MappingStatus, ResolvedIdentity,
    TurnRole, UsageReport,
};

pub use traits::{
    CatalogStore, ClassifierProvider, ClassifyRequest, ConfigStore, KeyStore, PersonaStore,
    UsageSink,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_round_trips_through_json() {
        let decision = Decision {
            id: "d-1".into(),
            intent: Intent::CommandRequest,
            confidence: 0.95,
            params: std::collections::BTreeMap::from([(
                "user".to_string(),
                "42".to_string(),
            )]),
            actions: vec![Action::Command {
                name: "ban".into(),
                command_id: None,
                args: std::collections::BTreeMap::new(),
            }],
        };
        let json = serde_json::to_string(&decision).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(decision, back);
    }

    #[test]
    fn trait_objects_are_constructible() {
        // The seams must stay object-safe; the engine holds them as
        // Arc<dyn Trait>. If any trait loses object safety this stops
        // compiling.
        fn _key(_: &dyn KeyStore) {}
        fn _config(_: &dyn ConfigStore) {}
        fn _catalog(_: &dyn CatalogStore) {}
        fn _persona(_: &dyn PersonaStore) {}
        fn _provider(_: &dyn ClassifierProvider) {}
        fn _usage(_: &dyn UsageSink) {}
    }
}
