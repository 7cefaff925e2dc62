// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision assembly.
//!
//! Pure construction of the canonical [`Decision`] object: a fresh unique
//! id, the intent tag, normalized confidence, merged params and the ordered
//! action list. No I/O happens here.

use std::collections::BTreeMap;

use relay_core::{Action, Decision, Intent};

/// Fresh unique decision id.
fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A decision that triggers one command execution.
pub fn command(
    name: impl Into<String>,
    command_id: Option<String>,
    confidence: f32,
    params: BTreeMap<String, String>,
) -> Decision {
    Decision {
        id: fresh_id(),
        intent: Intent::CommandRequest,
        confidence,
        actions: vec![Action::Command {
            name: name.into(),
            command_id,
            args: params.clone(),
        }],
        params,
    }
}

/// A decision that sends one reply.
pub fn reply(text: impl Into<String>, confidence: f32) -> Decision {
    Decision {
        id: fresh_id(),
        intent: Intent::ConversationalReply,
        confidence,
        params: BTreeMap::new(),
        actions: vec![Action::Reply { text: text.into() }],
    }
}

/// A terminal-but-successful gate decision (`filtered` or `disabled`).
///
/// Carries at most one informational reply action and full confidence:
/// policy outcomes are certain.
pub fn blocked(intent: Intent, reply_text: Option<String>) -> Decision {
    Decision {
        id: fresh_id(),
        intent,
        confidence: 1.0,
        params: BTreeMap::new(),
        actions: reply_text
            .map(|text| vec![Action::Reply { text }])
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_decision_shape() {
        let params = BTreeMap::from([("user".to_string(), "42".to_string())]);
        let d = command("ban", Some("m1".into()), 0.95, params);
        assert_eq!(d.intent, Intent::CommandRequest);
        assert_eq!(d.actions.len(), 1);
        assert!(matches!(&d.actions[0], Action::Command { name, .. } if name == "ban"));
        assert_eq!(d.params.get("user").map(String::as_str), Some("42"));
    }

    #[test]
    fn reply_decision_shape() {
        let d = reply("hello", 0.9);
        assert_eq!(d.intent, Intent::ConversationalReply);
        assert!(matches!(&d.actions[0], Action::Reply { text } if text == "hello"));
    }

    #[test]
    fn blocked_decisions_have_zero_or_one_action() {
        let filtered = blocked(Intent::Filtered, None);
        assert!(filtered.actions.is_empty());

        let disabled = blocked(Intent::Disabled, Some("bot is off".into()));
        assert_eq!(disabled.actions.len(), 1);
    }

    #[test]
    fn ids_are_unique_per_emission() {
        let a = reply("x", 0.5);
        let b = reply("x", 0.5);
        assert_ne!(a.id, b.id);
    }
}
