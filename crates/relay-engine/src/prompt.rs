// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification prompt construction.
//!
//! Builds the system/user pair sent to the provider: persona text, few-shot
//! example phrases, the active command catalog, recent conversation context
//! and the message under classification, plus strict output-format
//! instructions so the response contains exactly one JSON object.

use relay_core::{
    BotPersona, ClassifyRequest, CommandMapping, ConversationTurn, InboundEvent, TurnRole,
};

const DEFAULT_PERSONA: &str =
    "You are a helpful assistant attached to a chat server's moderation bot.";

const FORMAT_INSTRUCTIONS: &str = r#"Decide whether the message is a command request or conversation.
Respond with exactly one JSON object and nothing else, using these fields:
- "isCommand": boolean
- if it matches a command: "bestMatch": {"commandId": string, "confidence": integer 0-100, "params": object of string values}
- if it is conversation: "conversationalResponse": string
- if the intent is a command but details are missing: "clarificationQuestion": string
Never invent a commandId that is not in the catalog."#;

/// Build the classification request for one event.
pub fn build_prompt(
    persona: Option<&BotPersona>,
    catalog: &[CommandMapping],
    context: &[ConversationTurn],
    event: &InboundEvent,
) -> ClassifyRequest {
    let mut system = String::new();

    match persona {
        Some(p) if !p.personality.trim().is_empty() => system.push_str(p.personality.trim()),
        _ => system.push_str(DEFAULT_PERSONA),
    }
    system.push('\n');

    if let Some(examples) = persona.and_then(|p| p.examples.as_deref()) {
        if !examples.trim().is_empty() {
            system.push_str("\nExample phrasings users have tried:\n");
            system.push_str(examples.trim());
            system.push('\n');
        }
    }

    if catalog.is_empty() {
        system.push_str("\nNo commands are registered for this bot.\n");
    } else {
        system.push_str("\nAvailable commands:\n");
        for mapping in catalog {
            system.push_str(&format!(
                "- id={} name={} matches=\"{}\"\n",
                mapping.id, mapping.name, mapping.pattern
            ));
        }
    }

    system.push('\n');
    system.push_str(FORMAT_INSTRUCTIONS);

    let mut user = String::new();
    if !context.is_empty() {
        user.push_str("Recent conversation:\n");
        for turn in context {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Bot => "bot",
            };
            user.push_str(&format!("{role}: {}\n", turn.text));
        }
        user.push('\n');
    }
    if let Some(referenced) = event
        .referenced_message_content
        .as_deref()
        .filter(|_| event.is_reply_to_bot)
    {
        user.push_str(&format!("(replying to the bot's message: {referenced})\n"));
    }
    user.push_str(&format!("Message: {}", event.content));

    ClassifyRequest { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::MappingStatus;

    fn mapping(id: &str, name: &str, pattern: &str) -> CommandMapping {
        CommandMapping {
            id: id.into(),
            tenant_id: "t1".into(),
            bot_id: "b1".into(),
            name: name.into(),
            pattern: pattern.into(),
            template: String::new(),
            status: MappingStatus::Active,
            usage_count: 0,
        }
    }

    fn event(content: &str) -> InboundEvent {
        InboundEvent {
            content: content.into(),
            channel_id: "c1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn prompt_includes_catalog_and_message() {
        let catalog = vec![mapping("m1", "ban", "ban a user")];
        let req = build_prompt(None, &catalog, &[], &event("please ban him"));
        assert!(req.system.contains("id=m1 name=ban"));
        assert!(req.system.contains("isCommand"));
        assert!(req.user.ends_with("Message: please ban him"));
    }

    #[test]
    fn persona_text_overrides_default() {
        let persona = BotPersona {
            bot_id: "b1".into(),
            tenant_id: "t1".into(),
            personality: "You are Gruff, a terse doorman.".into(),
            examples: Some("boot that guy\nthrow them out".into()),
            connected: true,
        };
        let req = build_prompt(Some(&persona), &[], &[], &event("hi"));
        assert!(req.system.contains("Gruff"));
        assert!(!req.system.contains(DEFAULT_PERSONA));
        assert!(req.system.contains("boot that guy"));
        assert!(req.system.contains("No commands are registered"));
    }

    #[test]
    fn context_turns_are_rendered_in_order() {
        let context = vec![
            ConversationTurn::user("who are you"),
            ConversationTurn::bot("the moderator"),
        ];
        let req = build_prompt(None, &[], &context, &event("ok then"));
        let user_pos = req.user.find("user: who are you").unwrap();
        let bot_pos = req.user.find("bot: the moderator").unwrap();
        assert!(user_pos < bot_pos);
    }

    #[test]
    fn referenced_content_only_for_bot_replies() {
        let mut e = event("what did you mean?");
        e.referenced_message_content = Some("I muted them".into());
        let req = build_prompt(None, &[], &[], &e);
        assert!(!req.user.contains("I muted them"));

        e.is_reply_to_bot = true;
        let req = build_prompt(None, &[], &[], &e);
        assert!(req.user.contains("I muted them"));
    }
}
