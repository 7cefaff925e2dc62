// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the relay decision pipeline.
//!
//! The inbound event mirrors the wire shape produced by Discord-style bot
//! runners (camelCase field names, unknown fields ignored). The [`Decision`]
//! is the canonical output contract consumed by the downstream executor.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An inbound chat event as received from a bot runner.
///
/// Only the fields listed here are consumed; anything else on the wire is
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    /// Raw message content.
    pub content: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Guild (server) the channel belongs to, when known.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Author of the message. Absent for legacy callers that do not
    /// propagate user identity; memory then falls back to the bot scope.
    #[serde(default)]
    pub author_id: Option<String>,
    /// Bot the event targets. May instead come from the API key binding.
    #[serde(default)]
    pub bot_id: Option<String>,
    /// The bot's own client id on the chat platform, used to skip
    /// self-mentions during parameter extraction.
    #[serde(default)]
    pub bot_client_id: Option<String>,
    /// Whether this message is a direct reply to one of the bot's messages.
    #[serde(default)]
    pub is_reply_to_bot: bool,
    /// Content of the message being replied to, when the runner provides it.
    #[serde(default)]
    pub referenced_message_content: Option<String>,
}

/// Closed set of decision intents.
///
/// Serialized with dotted tags so downstream executors can pattern-match
/// exhaustively instead of string-scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Intent {
    /// The message should trigger a command execution.
    #[serde(rename = "command.request")]
    #[strum(serialize = "command.request")]
    CommandRequest,
    /// The message should get a conversational (or clarifying) reply.
    #[serde(rename = "conversational.reply")]
    #[strum(serialize = "conversational.reply")]
    ConversationalReply,
    /// The policy gate filtered the event (channel rules).
    #[serde(rename = "filtered")]
    #[strum(serialize = "filtered")]
    Filtered,
    /// The bot's master switch is off.
    #[serde(rename = "disabled")]
    #[strum(serialize = "disabled")]
    Disabled,
}

/// One entry in a decision's ordered action list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Execute a command with the given arguments.
    #[serde(rename_all = "camelCase")]
    Command {
        /// Command name (slash token or catalog mapping name).
        name: String,
        /// Catalog mapping id, when the classifier matched one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        command_id: Option<String>,
        /// Extracted command arguments.
        #[serde(default)]
        args: BTreeMap<String, String>,
    },
    /// Send a reply with the given text.
    Reply {
        /// Reply text. Never fabricated: this is always text the pipeline
        /// actually decided on (model output or a fixed clarification).
        text: String,
    },
}

/// The canonical output of the relay pipeline for one inbound event.
///
/// Immutable once built; replayed verbatim (same id) on idempotent retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Unique per emission; echoed in the `x-decision-id` response header.
    pub id: String,
    /// What kind of outcome this is.
    pub intent: Intent,
    /// Normalized confidence in [0, 1] (see `normalize_confidence`).
    pub confidence: f32,
    /// Merged command parameters (model output wins, deterministic
    /// extraction fills the blanks).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// Ordered actions for the downstream executor.
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Who produced a stored conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Bot,
}

/// One remembered conversational turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Bot,
            text: text.into(),
        }
    }
}

/// A stored API key record, as returned by the key store collaborator.
///
/// Immutable except for revocation; rotation creates a new record and
/// revokes the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// The key identifier (the presented key string).
    pub key_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Bot this key is bound to, if any.
    #[serde(default)]
    pub bot_id: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Expiry timestamp; `None` means the key never expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Revocation timestamp; `Some` means the key is dead.
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    /// A key is usable iff it is not revoked and not past its expiry.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        match self.expires_at {
            Some(expiry) => expiry > now,
            None => true,
        }
    }
}

/// The identity resolved from a presented API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub tenant_id: String,
    /// Bot bound to the key, if the key is bot-scoped.
    pub bot_id: Option<String>,
    pub scopes: Vec<String>,
}

/// Per-bot persona used for classification prompt construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotPersona {
    pub bot_id: String,
    pub tenant_id: String,
    /// Personality text injected into the system prompt.
    #[serde(default)]
    pub personality: String,
    /// Optional few-shot example phrases, one per line.
    #[serde(default)]
    pub examples: Option<String>,
    /// Whether the bot is currently connected to its platform.
    #[serde(default)]
    pub connected: bool,
}

/// Channel filtering mode for the policy gate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChannelMode {
    /// Every channel is allowed.
    #[default]
    All,
    /// Only channels in the allow set are processed.
    Whitelist,
    /// Channels in the deny set are filtered out.
    Blacklist,
}

/// Per-bot configuration.
///
/// Exactly one configuration exists per bot id; absence means "all defaults,
/// enabled" and the config store creates the default row lazily on first
/// read. The gate only enforces `enabled` and the channel rules here; role
/// and user sets, rate limits, the dangerous-command set and the confidence
/// threshold are carried through for the downstream executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfiguration {
    pub bot_id: String,
    /// Master switch. Off means every event yields a `disabled` decision.
    pub enabled: bool,
    pub channel_mode: ChannelMode,
    pub allowed_channels: Vec<String>,
    pub blocked_channels: Vec<String>,
    pub allowed_roles: Vec<String>,
    pub denied_roles: Vec<String>,
    pub allowed_users: Vec<String>,
    pub denied_users: Vec<String>,
    /// Command categories the bot may execute.
    pub enabled_categories: Vec<String>,
    pub per_user_rate_limit: u32,
    pub per_channel_rate_limit: u32,
    /// Minimum classifier confidence the executor should act on.
    pub confidence_threshold: f32,
    /// Commands the executor must double-confirm.
    pub dangerous_commands: Vec<String>,
    /// Reply tone tag passed to the executor.
    pub response_style: String,
}

impl Default for BotConfiguration {
    fn default() -> Self {
        Self {
            bot_id: String::new(),
            enabled: true,
            channel_mode: ChannelMode::All,
            allowed_channels: Vec::new(),
            blocked_channels: Vec::new(),
            allowed_roles: Vec::new(),
            denied_roles: Vec::new(),
            allowed_users: Vec::new(),
            denied_users: Vec::new(),
            enabled_categories: Vec::new(),
            per_user_rate_limit: 20,
            per_channel_rate_limit: 60,
            confidence_threshold: 0.6,
            dangerous_commands: vec!["ban".into(), "kick".into(), "purge".into()],
            response_style: "neutral".into(),
        }
    }
}

impl BotConfiguration {
    /// The implicit configuration used when a bot has none stored yet.
    pub fn defaults_for(bot_id: impl Into<String>) -> Self {
        Self {
            bot_id: bot_id.into(),
            ..Self::default()
        }
    }
}

/// Lifecycle status of a command mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingStatus {
    #[default]
    Active,
    /// Anything that is not `active` is ignored by the classifier.
    #[serde(other)]
    Inactive,
}

/// A natural-language command mapping from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMapping {
    pub id: String,
    pub tenant_id: String,
    pub bot_id: String,
    /// Short command name, e.g. `ban`.
    pub name: String,
    /// Natural-language pattern the owner registered, e.g. "ban a user".
    pub pattern: String,
    /// Output template with named placeholders, e.g. `/ban {user} {reason}`.
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub status: MappingStatus,
    /// Incremented by the execution layer, read-only here.
    #[serde(default)]
    pub usage_count: u64,
}

/// One metering unit reported to the usage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Idempotency key when supplied, otherwise the decision id, so the
    /// collaborator can dedupe retried requests too.
    pub key: String,
    pub tenant_id: String,
    #[serde(default)]
    pub bot_id: Option<String>,
}
