// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic, regex-driven parameter extraction.
//!
//! Runs independently of the classifier: mention ids, a trailing numeric
//! token, reason clauses and free-text message content are pulled straight
//! from the raw message. Model-extracted parameters win field-by-field on
//! merge; anything the model left blank is filled from here.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(\d+)>").expect("valid regex"));
static ROLE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@&(\d+)>").expect("valid regex"));
static CHANNEL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<#(\d+)>").expect("valid regex"));
static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*$").expect("valid regex"));
static REASON_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:for|because|being)\s+(.+)$").expect("valid regex"));

/// Leading words stripped from say/note-style messages.
const MESSAGE_LEAD_WORDS: &[&str] = &["say", "announce", "note", "tell", "send"];

/// Extract parameters from raw message content.
///
/// `template` is the matched command's output template, used to decide
/// whether a trailing number means `amount` or `duration` and whether the
/// command wants free-text `message` content.
pub fn extract_params(
    content: &str,
    bot_client_id: Option<&str>,
    template: Option<&str>,
) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let trimmed = content.trim();

    if let Some(user) = target_user(trimmed, bot_client_id) {
        params.insert("user".to_string(), user);
    }
    if let Some(m) = ROLE_MENTION.captures(trimmed) {
        params.insert("role".to_string(), m[1].to_string());
    }
    if let Some(m) = CHANNEL_MENTION.captures(trimmed) {
        params.insert("channel".to_string(), m[1].to_string());
    }

    if let Some(m) = TRAILING_NUMBER.captures(trimmed) {
        let key = numeric_key(template);
        params.insert(key.to_string(), m[1].to_string());
    }

    if let Some(m) = REASON_CLAUSE.captures(trimmed) {
        let reason = m[1]
            .trim()
            .trim_end_matches(['.', '!', '?'])
            .trim()
            .to_string();
        if !reason.is_empty() {
            params.insert("reason".to_string(), reason);
        }
    }

    if template.is_some_and(|t| t.contains("{message}")) {
        if let Some(message) = message_text(trimmed) {
            params.insert("message".to_string(), message);
        }
    }

    params
}

/// Merge model-extracted parameters over deterministic ones.
///
/// Model output wins field-by-field; blank or missing model fields keep the
/// deterministic value.
pub fn merge_params(
    model: BTreeMap<String, String>,
    extracted: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = extracted;
    for (key, value) in model {
        if !value.trim().is_empty() {
            merged.insert(key, value);
        }
    }
    merged
}

/// Pick the target user among mentions.
///
/// Natural commands are almost always phrased as "@bot do X to @target", so
/// when the first mention opens the message (or is the bot's own client id)
/// and another mention follows, the second one is the real target.
fn target_user(content: &str, bot_client_id: Option<&str>) -> Option<String> {
    let mentions: Vec<(usize, String)> = USER_MENTION
        .captures_iter(content)
        .map(|c| {
            let m = c.get(0).expect("whole match");
            (m.start(), c[1].to_string())
        })
        .collect();

    let (first_pos, first_id) = mentions.first()?;
    let first_is_bot = bot_client_id.is_some_and(|b| b == first_id) || *first_pos == 0;

    if first_is_bot {
        if let Some((_, second_id)) = mentions.get(1) {
            return Some(second_id.clone());
        }
        // A lone mention that is provably the bot itself is not a target.
        if bot_client_id.is_some_and(|b| b == first_id) {
            return None;
        }
    }
    Some(first_id.clone())
}

/// Which key a trailing numeric token maps to for a given template.
fn numeric_key(template: Option<&str>) -> &'static str {
    match template {
        Some(t) if t.contains("{duration}") && !t.contains("{amount}") => "duration",
        _ => "amount",
    }
}

/// Free-text message content for say/note-style commands: strip mentions,
/// drop a leading imperative word, keep the rest.
fn message_text(content: &str) -> Option<String> {
    let without_mentions = USER_MENTION.replace_all(content, "");
    let without_mentions = CHANNEL_MENTION.replace_all(&without_mentions, "");
    let cleaned = without_mentions.trim();

    let rest = cleaned
        .split_once(char::is_whitespace)
        .filter(|(first, _)| MESSAGE_LEAD_WORDS.contains(&first.to_lowercase().as_str()))
        .map(|(_, rest)| rest)
        .unwrap_or(cleaned);

    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_user_and_reason() {
        let params = extract_params("warn <@123> for spamming", None, None);
        assert_eq!(params.get("user").map(String::as_str), Some("123"));
        assert_eq!(params.get("reason").map(String::as_str), Some("spamming"));
    }

    #[test]
    fn skips_leading_bot_mention() {
        let params = extract_params("<@999> ban <@123> for trolling", Some("999"), None);
        assert_eq!(params.get("user").map(String::as_str), Some("123"));
    }

    #[test]
    fn skips_leading_mention_without_known_bot_id() {
        // Heuristic: the very first token being a mention means "@bot ...".
        let params = extract_params("<@999> mute <@123>", None, None);
        assert_eq!(params.get("user").map(String::as_str), Some("123"));
    }

    #[test]
    fn lone_bot_mention_is_not_a_target() {
        let params = extract_params("<@999> purge 10", Some("999"), None);
        assert!(!params.contains_key("user"));
        assert_eq!(params.get("amount").map(String::as_str), Some("10"));
    }

    #[test]
    fn lone_mid_message_mention_is_target() {
        let params = extract_params("please kick <@55>", None, None);
        assert_eq!(params.get("user").map(String::as_str), Some("55"));
    }

    #[test]
    fn extracts_role_and_channel() {
        let params = extract_params("give <@&77> access to <#88>", None, None);
        assert_eq!(params.get("role").map(String::as_str), Some("77"));
        assert_eq!(params.get("channel").map(String::as_str), Some("88"));
    }

    #[test]
    fn trailing_number_maps_to_amount_by_default() {
        let params = extract_params("delete the last 25", None, None);
        assert_eq!(params.get("amount").map(String::as_str), Some("25"));
    }

    #[test]
    fn trailing_number_maps_to_duration_when_template_says_so() {
        let params = extract_params("mute <@1> 15", None, Some("/mute {user} {duration}"));
        assert_eq!(params.get("duration").map(String::as_str), Some("15"));
        assert!(!params.contains_key("amount"));
    }

    #[test]
    fn because_and_being_clauses_work() {
        let params = extract_params("ban <@1> because he spammed!", None, None);
        assert_eq!(params.get("reason").map(String::as_str), Some("he spammed"));

        let params = extract_params("mute <@1> being rude", None, None);
        assert_eq!(params.get("reason").map(String::as_str), Some("rude"));
    }

    #[test]
    fn message_extracted_only_for_message_templates() {
        let params = extract_params("say welcome everyone", None, Some("/say {message}"));
        assert_eq!(
            params.get("message").map(String::as_str),
            Some("welcome everyone")
        );

        let params = extract_params("say welcome everyone", None, None);
        assert!(!params.contains_key("message"));
    }

    #[test]
    fn model_params_win_but_blanks_are_filled() {
        let extracted = extract_params("warn <@123> for spamming", None, None);
        let model = BTreeMap::from([
            ("user".to_string(), "456".to_string()),
            ("reason".to_string(), "  ".to_string()),
        ]);
        let merged = merge_params(model, extracted);
        // Model user wins; blank model reason falls back to the extractor.
        assert_eq!(merged.get("user").map(String::as_str), Some("456"));
        assert_eq!(merged.get("reason").map(String::as_str), Some("spamming"));
    }

    #[test]
    fn mention_ids_do_not_leak_into_trailing_number() {
        let params = extract_params("warn <@123>", None, None);
        assert!(!params.contains_key("amount"));
    }
}
