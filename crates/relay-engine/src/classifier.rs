// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language intent classification with conservative fallback.
//!
//! The provider call runs under a hard deadline; a timeout, transport error
//! or unparseable response is a classification failure, never a request
//! failure. The fallback scans for moderation keywords and asks for
//! clarification instead of guessing, and it never synthesizes reply text
//! the system did not actually decide on.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use relay_core::{ClassifierProvider, ClassifyRequest};
use tracing::{debug, warn};

use crate::verdict::{normalize_confidence, parse_verdict};

/// Confidence attached to conversational replies produced by the model.
pub const REPLY_CONFIDENCE: f32 = 0.9;

/// Confidence attached to clarification questions.
pub const CLARIFY_CONFIDENCE: f32 = 0.5;

/// Default confidence when the model matched a command but omitted a score.
const UNSCORED_MATCH_CONFIDENCE: f32 = 0.5;

/// Moderation vocabulary scanned by the fallback.
const MODERATION_KEYWORDS: &[&str] = &[
    "ban", "kick", "warn", "mute", "unmute", "timeout", "purge", "clear", "prune", "delete",
    "lock", "unlock", "slowmode",
];

/// Keywords that imply a bulk message deletion needing a count.
const BULK_DELETE_KEYWORDS: &[&str] = &["purge", "clear", "prune", "delete"];

const DELETE_COUNT_QUESTION: &str = "How many messages should I delete?";

const GENERIC_CLARIFICATION: &str =
    "That looks like a moderation command, but I couldn't work out the details. \
     Could you rephrase it, e.g. \"ban @user for spamming\"?";

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The message maps to a catalog command.
    Command {
        command_id: Option<String>,
        confidence: f32,
        /// Model-extracted parameters, pre-merge.
        params: BTreeMap<String, String>,
    },
    /// The message gets a conversational reply the model actually produced.
    Reply { text: String, confidence: f32 },
    /// Command intent detected but under-specified; ask, don't guess.
    Clarify { question: String },
    /// No command intent and nothing to say.
    NoIntent,
}

/// Classifier over the external provider seam.
pub struct IntentClassifier {
    provider: Arc<dyn ClassifierProvider>,
    timeout: Duration,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn ClassifierProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Classify a message given its prepared prompt.
    ///
    /// `content` is the raw message, used only by the keyword fallback when
    /// the provider path fails.
    pub async fn classify(&self, prompt: &ClassifyRequest, content: &str) -> Classification {
        let raw = match tokio::time::timeout(self.timeout, self.provider.classify(prompt)).await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!(error = %e, "classification call failed, using keyword fallback");
                return keyword_fallback(content);
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "classification call timed out, using keyword fallback");
                return keyword_fallback(content);
            }
        };

        match parse_verdict(&raw) {
            Some(verdict) => {
                if let Some(best) = verdict.best_match.filter(|_| verdict.is_command) {
                    let confidence = best
                        .confidence
                        .map(normalize_confidence)
                        .unwrap_or(UNSCORED_MATCH_CONFIDENCE);
                    return Classification::Command {
                        params: best.string_params(),
                        command_id: best.command_id,
                        confidence,
                    };
                }
                if let Some(question) = verdict.clarification_question {
                    return Classification::Clarify { question };
                }
                if let Some(text) = verdict.conversational_response {
                    return Classification::Reply {
                        text,
                        confidence: REPLY_CONFIDENCE,
                    };
                }
                if verdict.is_command {
                    // Claims a command but named none: under-specified.
                    return keyword_fallback(content);
                }
                debug!("verdict carries no command and no response");
                Classification::NoIntent
            }
            None => {
                warn!("provider response contained no parseable JSON object");
                keyword_fallback(content)
            }
        }
    }
}

/// Conservative keyword heuristics for provider failure.
///
/// A bulk-delete keyword with no count present gets the special count
/// question; any other moderation keyword gets a generic clarification; no
/// keyword means no command intent, and no reply is fabricated.
pub fn keyword_fallback(content: &str) -> Classification {
    let lower = content.to_lowercase();
    let has_keyword = MODERATION_KEYWORDS
        .iter()
        .any(|k| contains_word(&lower, k));
    if !has_keyword {
        return Classification::NoIntent;
    }

    let bulk = BULK_DELETE_KEYWORDS.iter().any(|k| contains_word(&lower, k));
    if bulk && !lower.chars().any(|c| c.is_ascii_digit()) {
        return Classification::Clarify {
            question: DELETE_COUNT_QUESTION.to_string(),
        };
    }

    Classification::Clarify {
        question: GENERIC_CLARIFICATION.to_string(),
    }
}

/// Whole-word containment, so "urban" does not trigger "ban".
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}
