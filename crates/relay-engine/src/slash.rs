// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command fast path.
//!
//! Syntactically explicit input (`/ban user=42`) carries its own intent and
//! never incurs classifier latency or cost: the command name is the leading
//! `/word` token and arguments are space-separated `key=value` pairs.

use std::collections::BTreeMap;

/// Fixed confidence for slash-path decisions, on the normalized 0-1 scale.
pub const SLASH_CONFIDENCE: f32 = 0.95;

/// A parsed explicit slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: String,
    pub args: BTreeMap<String, String>,
}

/// Parse the trimmed content as a slash command, if it is one.
///
/// Tokens after the command that are not `key=value` pairs are ignored.
pub fn parse_slash(content: &str) -> Option<SlashCommand> {
    let trimmed = content.trim();
    let rest = trimmed.strip_prefix('/')?;

    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let mut args = BTreeMap::new();
    for token in tokens {
        if let Some((key, value)) = token.split_once('=') {
            if !key.is_empty() {
                args.insert(key.to_string(), value.to_string());
            }
        }
    }

    Some(SlashCommand {
        name: name.to_lowercase(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_with_args() {
        let cmd = parse_slash("/ban user=42 reason=spam").unwrap();
        assert_eq!(cmd.name, "ban");
        assert_eq!(cmd.args.get("user").map(String::as_str), Some("42"));
        assert_eq!(cmd.args.get("reason").map(String::as_str), Some("spam"));
    }

    #[test]
    fn parses_bare_command() {
        let cmd = parse_slash("  /help  ").unwrap();
        assert_eq!(cmd.name, "help");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn ignores_non_pair_tokens() {
        let cmd = parse_slash("/kick someone user=7").unwrap();
        assert_eq!(cmd.args.len(), 1);
        assert_eq!(cmd.args.get("user").map(String::as_str), Some("7"));
    }

    #[test]
    fn rejects_non_slash_content() {
        assert!(parse_slash("ban user=42").is_none());
        assert!(parse_slash("").is_none());
        assert!(parse_slash("/").is_none());
    }

    #[test]
    fn rejects_non_word_command() {
        // A leading slash followed by punctuation is not a command.
        assert!(parse_slash("/...").is_none());
        assert!(parse_slash("/huh?!").is_none());
    }

    #[test]
    fn command_name_is_lowercased() {
        assert_eq!(parse_slash("/Ban").unwrap().name, "ban");
    }
}
