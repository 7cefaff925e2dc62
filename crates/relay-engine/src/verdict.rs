// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of raw provider output into a classification verdict.
//!
//! The provider returns free text that is expected to contain one JSON
//! object. The first balanced object is extracted (string-aware, so braces
//! inside quoted values do not confuse the scan) and deserialized leniently.
//! Anything malformed is a classification failure for the caller to recover
//! from, never a crash.

use std::collections::BTreeMap;

use serde::Deserialize;

/// The JSON shape requested from the provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Verdict {
    pub is_command: bool,
    pub best_match: Option<BestMatch>,
    pub conversational_response: Option<String>,
    pub clarification_question: Option<String>,
}

/// The matched catalog command reported by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BestMatch {
    pub command_id: Option<String>,
    /// Raw model confidence; prompts ask for 0-100 integers but models
    /// sometimes answer with 0-1 floats, so both are accepted.
    pub confidence: Option<f64>,
    /// Extracted parameters; values may come back as any JSON scalar.
    pub params: BTreeMap<String, serde_json::Value>,
}

impl BestMatch {
    /// Parameters as strings, dropping nulls.
    pub fn string_params(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .filter_map(|(k, v)| {
                let s = match v {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((k.clone(), s))
            })
            .collect()
    }
}

/// Normalize a raw model confidence onto the canonical 0-1 scale.
///
/// Mapping: values greater than 1.0 are read as 0-100 integers and divided
/// by 100; values in [0, 1] pass through; everything is clamped to [0, 1].
pub fn normalize_confidence(raw: f64) -> f32 {
    let scaled = if raw > 1.0 { raw / 100.0 } else { raw };
    scaled.clamp(0.0, 1.0) as f32
}

/// Extract the first balanced JSON object from raw provider text.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse raw provider text into a [`Verdict`], or `None` on malformed output.
pub fn parse_verdict(raw: &str) -> Option<Verdict> {
    let json = extract_json_object(raw)?;
    serde_json::from_str(json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_from_prose() {
        let raw = r#"Sure! Here is the result: {"isCommand": true} hope that helps"#;
        assert_eq!(extract_json_object(raw), Some(r#"{"isCommand": true}"#));
    }

    #[test]
    fn extracts_nested_object() {
        let raw = r#"{"a": {"b": {"c": 1}}, "d": 2} trailing"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"a": {"b": {"c": 1}}, "d": 2}"#)
        );
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_scan() {
        let raw = r#"{"text": "a } inside \" and { too"}"#;
        assert_eq!(extract_json_object(raw), Some(raw));
    }

    #[test]
    fn no_object_yields_none() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("{unterminated").is_none());
        assert!(parse_verdict("{not: valid json}").is_none());
    }

    #[test]
    fn parses_command_verdict() {
        let raw = r#"{"isCommand": true, "bestMatch": {"commandId": "m1", "confidence": 85, "params": {"user": "42", "amount": 5}}}"#;
        let verdict = parse_verdict(raw).unwrap();
        assert!(verdict.is_command);
        let best = verdict.best_match.unwrap();
        assert_eq!(best.command_id.as_deref(), Some("m1"));
        let params = best.string_params();
        assert_eq!(params.get("user").map(String::as_str), Some("42"));
        assert_eq!(params.get("amount").map(String::as_str), Some("5"));
    }

    #[test]
    fn parses_conversational_verdict() {
        let raw = r#"{"isCommand": false, "conversationalResponse": "hello there"}"#;
        let verdict = parse_verdict(raw).unwrap();
        assert!(!verdict.is_command);
        assert_eq!(
            verdict.conversational_response.as_deref(),
            Some("hello there")
        );
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let raw = r#"{"isCommand": false, "reasoning": "irrelevant"}"#;
        assert!(parse_verdict(raw).is_some());
    }

    #[test]
    fn null_params_are_dropped() {
        let raw = r#"{"isCommand": true, "bestMatch": {"commandId": "m1", "params": {"user": null, "reason": "spam"}}}"#;
        let params = parse_verdict(raw).unwrap().best_match.unwrap().string_params();
        assert!(!params.contains_key("user"));
        assert_eq!(params.get("reason").map(String::as_str), Some("spam"));
    }

    #[test]
    fn confidence_normalization_mapping() {
        // 0-100 integer scale.
        assert_eq!(normalize_confidence(85.0), 0.85);
        assert_eq!(normalize_confidence(100.0), 1.0);
        // Already-normalized floats pass through.
        assert_eq!(normalize_confidence(0.7), 0.7);
        assert_eq!(normalize_confidence(1.0), 1.0);
        // Out-of-range values clamp.
        assert_eq!(normalize_confidence(250.0), 1.0);
        assert_eq!(normalize_confidence(-3.0), 0.0);
    }
}
