// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-bot policy gate.
//!
//! Enforces the master switch and channel allow/deny rules before any memory
//! mutation or classification work happens. Role/user sets and rate limits
//! live in the configuration but are consumed by the downstream executor,
//! not evaluated here.

use relay_core::{BotConfiguration, ChannelMode, Intent};
use tracing::debug;

/// Reply sent when the master switch is off.
const DISABLED_REPLY: &str =
    "This bot is currently disabled. An administrator can re-enable it from the dashboard.";

/// Outcome of the policy gate for one event.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Continue down the pipeline.
    Proceed,
    /// Stop here with a terminal-but-successful decision.
    Blocked {
        intent: Intent,
        /// An informational reply, present only for `disabled`.
        reply: Option<String>,
    },
}

/// Evaluate the gate rules in order for a bot configuration and channel.
pub fn evaluate(config: &BotConfiguration, channel_id: &str) -> GateOutcome {
    if !config.enabled {
        debug!(bot_id = %config.bot_id, "gate: bot disabled");
        return GateOutcome::Blocked {
            intent: Intent::Disabled,
            reply: Some(DISABLED_REPLY.to_string()),
        };
    }

    match config.channel_mode {
        ChannelMode::All => GateOutcome::Proceed,
        ChannelMode::Whitelist => {
            // An empty allow set is treated as "not yet configured", not
            // "block everything".
            if !config.allowed_channels.is_empty()
                && !config.allowed_channels.iter().any(|c| c == channel_id)
            {
                debug!(bot_id = %config.bot_id, channel_id, "gate: channel not whitelisted");
                GateOutcome::Blocked {
                    intent: Intent::Filtered,
                    reply: None,
                }
            } else {
                GateOutcome::Proceed
            }
        }
        ChannelMode::Blacklist => {
            if config.blocked_channels.iter().any(|c| c == channel_id) {
                debug!(bot_id = %config.bot_id, channel_id, "gate: channel blacklisted");
                GateOutcome::Blocked {
                    intent: Intent::Filtered,
                    reply: None,
                }
            } else {
                GateOutcome::Proceed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BotConfiguration {
        BotConfiguration::defaults_for("b1")
    }

    #[test]
    fn default_config_proceeds() {
        assert_eq!(evaluate(&config(), "any-channel"), GateOutcome::Proceed);
    }

    #[test]
    fn disabled_blocks_with_reply() {
        let mut c = config();
        c.enabled = false;
        match evaluate(&c, "c1") {
            GateOutcome::Blocked { intent, reply } => {
                assert_eq!(intent, Intent::Disabled);
                assert!(reply.is_some());
            }
            other => panic!("expected blocked, got {other:?}"),
        }
    }

    #[test]
    fn whitelist_blocks_channels_outside_allow_set() {
        let mut c = config();
        c.channel_mode = ChannelMode::Whitelist;
        c.allowed_channels = vec!["A".into()];

        match evaluate(&c, "B") {
            GateOutcome::Blocked { intent, reply } => {
                assert_eq!(intent, Intent::Filtered);
                assert!(reply.is_none());
            }
            other => panic!("expected blocked, got {other:?}"),
        }
        assert_eq!(evaluate(&c, "A"), GateOutcome::Proceed);
    }

    #[test]
    fn empty_whitelist_proceeds() {
        let mut c = config();
        c.channel_mode = ChannelMode::Whitelist;
        assert_eq!(evaluate(&c, "anything"), GateOutcome::Proceed);
    }

    #[test]
    fn blacklist_blocks_listed_channels_only() {
        let mut c = config();
        c.channel_mode = ChannelMode::Blacklist;
        c.blocked_channels = vec!["bad".into()];

        assert!(matches!(
            evaluate(&c, "bad"),
            GateOutcome::Blocked {
                intent: Intent::Filtered,
                ..
            }
        ));
        assert_eq!(evaluate(&c, "good"), GateOutcome::Proceed);
    }

    #[test]
    fn disabled_wins_over_channel_rules() {
        let mut c = config();
        c.enabled = false;
        c.channel_mode = ChannelMode::Whitelist;
        c.allowed_channels = vec!["A".into()];
        // Even an allowed channel sees the disabled decision.
        assert!(matches!(
            evaluate(&c, "A"),
            GateOutcome::Blocked {
                intent: Intent::Disabled,
                ..
            }
        ));
    }
}
