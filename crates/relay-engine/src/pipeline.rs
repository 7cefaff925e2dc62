// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The relay pipeline: one inbound event in, at most one decision out.
//!
//! Order of operations: idempotency lookup (short-circuit on hit), policy
//! gate (short-circuit on block), then either the slash fast-path or the
//! natural-language path (memory update, classification, parameter
//! extraction), decision assembly, idempotency store, fire-and-forget usage
//! report.
//!
//! Each event is handled by one task; shared state lives behind the
//! injected store seams. Two concurrent events on the same memory scope
//! race with last-write-wins append order, an accepted approximation.

use std::sync::Arc;
use std::time::Duration;

use relay_core::{
    CatalogStore, ClassifierProvider, ConfigStore, ConversationTurn, Decision, InboundEvent,
    PersonaStore, RelayError, ResolvedIdentity, UsageReport, UsageSink,
};
use relay_memory::{read_preferred, ConversationStore, DecisionCache, ScopeKey};
use tracing::{debug, info, warn};

use crate::classifier::{Classification, IntentClassifier, CLARIFY_CONFIDENCE};
use crate::extract::{extract_params, merge_params};
use crate::gate::{self, GateOutcome};
use crate::slash::{parse_slash, SLASH_CONFIDENCE};
use crate::{decision, prompt, usage};

/// Default hard deadline on the external classification call.
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the engine talks to, behind seams.
pub struct EngineDeps {
    pub config_store: Arc<dyn ConfigStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub personas: Arc<dyn PersonaStore>,
    pub provider: Arc<dyn ClassifierProvider>,
    pub usage: Arc<dyn UsageSink>,
    pub conversations: Arc<dyn ConversationStore>,
    pub decisions: Arc<dyn DecisionCache>,
}

/// One authenticated engine request.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub identity: ResolvedIdentity,
    pub event: InboundEvent,
    pub idempotency_key: Option<String>,
}

/// The engine's answer for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    /// `None` means "nothing to do" and is not an error.
    pub decision: Option<Decision>,
    /// True when the decision was replayed from the idempotency guard.
    pub replayed: bool,
}

/// The relay decision engine.
pub struct RelayEngine {
    deps: EngineDeps,
    classifier: IntentClassifier,
}

impl RelayEngine {
    pub fn new(deps: EngineDeps) -> Self {
        Self::with_classify_timeout(deps, DEFAULT_CLASSIFY_TIMEOUT)
    }

    pub fn with_classify_timeout(deps: EngineDeps, timeout: Duration) -> Self {
        let classifier = IntentClassifier::new(deps.provider.clone(), timeout);
        Self { deps, classifier }
    }

    /// Run one event through the pipeline.
    ///
    /// The only hard failures are invalid input and collaborator store
    /// errors; classification failures recover via the keyword fallback and
    /// usage-report failures never surface.
    pub async fn handle(&self, request: EngineRequest) -> Result<EngineOutcome, RelayError> {
        let EngineRequest {
            identity,
            event,
            idempotency_key,
        } = request;

        let bot_id = event
            .bot_id
            .clone()
            .or_else(|| identity.bot_id.clone())
            .ok_or_else(|| {
                RelayError::InvalidEvent("no bot id on event or bound to API key".into())
            })?;

        // Idempotent replay short-circuits everything, original id included.
        if let Some(key) = idempotency_key.as_deref() {
            if let Some(previous) = self.deps.decisions.lookup(key).await {
                info!(key, decision_id = %previous.id, "replaying idempotent decision");
                return Ok(EngineOutcome {
                    decision: Some(previous),
                    replayed: true,
                });
            }
        }

        // Policy gate runs before any memory mutation or classifier work.
        let config = self.deps.config_store.load_or_init(&bot_id).await?;
        if let GateOutcome::Blocked { intent, reply } = gate::evaluate(&config, &event.channel_id)
        {
            let decision = decision::blocked(intent, reply);
            return Ok(self
                .finalize(decision, &identity, &bot_id, idempotency_key.as_deref())
                .await);
        }

        // Explicit syntax never incurs classifier latency or cost.
        if let Some(slash) = parse_slash(&event.content) {
            debug!(command = %slash.name, "slash fast-path");
            let decision = decision::command(slash.name, None, SLASH_CONFIDENCE, slash.args);
            return Ok(self
                .finalize(decision, &identity, &bot_id, idempotency_key.as_deref())
                .await);
        }

        // Natural-language path: remember the user turn first, then classify.
        self.remember(&event, &bot_id, ConversationTurn::user(&event.content))
            .await;

        let context = read_preferred(
            self.deps.conversations.as_ref(),
            &event.channel_id,
            &bot_id,
            event.author_id.as_deref(),
        )
        .await;

        // Persona/catalog lookups degrade to empty rather than failing the
        // request; classification still works without them.
        let persona = match self.deps.personas.persona(&bot_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "persona lookup failed, classifying without persona");
                None
            }
        };
        let catalog = match self
            .deps
            .catalog
            .active_mappings(&identity.tenant_id, &bot_id)
            .await
        {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "catalog lookup failed, classifying with empty catalog");
                Vec::new()
            }
        };

        let request = prompt::build_prompt(persona.as_ref(), &catalog, &context, &event);
        let classification = self.classifier.classify(&request, &event.content).await;

        let decision = match classification {
            Classification::Command {
                command_id,
                confidence,
                params,
            } => {
                let mapping = command_id
                    .as_deref()
                    .and_then(|id| catalog.iter().find(|m| m.id == id));
                let extracted = extract_params(
                    &event.content,
                    event.bot_client_id.as_deref(),
                    mapping.map(|m| m.template.as_str()),
                );
                let merged = merge_params(params, extracted);
                let name = mapping
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| "unknown".to_string());
                Some(decision::command(name, command_id, confidence, merged))
            }
            Classification::Reply { text, confidence } => {
                self.remember(&event, &bot_id, ConversationTurn::bot(&text))
                    .await;
                Some(decision::reply(text, confidence))
            }
            Classification::Clarify { question } => {
                self.remember(&event, &bot_id, ConversationTurn::bot(&question))
                    .await;
                Some(decision::reply(question, CLARIFY_CONFIDENCE))
            }
            Classification::NoIntent => None,
        };

        match decision {
            Some(decision) => Ok(self
                .finalize(decision, &identity, &bot_id, idempotency_key.as_deref())
                .await),
            None => {
                debug!("no command intent and nothing to say");
                Ok(EngineOutcome {
                    decision: None,
                    replayed: false,
                })
            }
        }
    }

    /// Append a turn to both memory scopes for this event.
    async fn remember(&self, event: &InboundEvent, bot_id: &str, turn: ConversationTurn) {
        let store = self.deps.conversations.as_ref();
        store
            .append(&ScopeKey::bot(&event.channel_id, bot_id), turn.clone())
            .await;
        if let Some(author) = event.author_id.as_deref() {
            store
                .append(&ScopeKey::user(&event.channel_id, bot_id, author), turn)
                .await;
        }
    }

    /// Store the decision under its idempotency key and report usage.
    async fn finalize(
        &self,
        decision: Decision,
        identity: &ResolvedIdentity,
        bot_id: &str,
        idempotency_key: Option<&str>,
    ) -> EngineOutcome {
        if let Some(key) = idempotency_key {
            self.deps.decisions.store(key, decision.clone()).await;
        }

        usage::spawn_report(
            self.deps.usage.clone(),
            UsageReport {
                key: idempotency_key
                    .map(str::to_string)
                    .unwrap_or_else(|| decision.id.clone()),
                tenant_id: identity.tenant_id.clone(),
                bot_id: Some(bot_id.to_string()),
            },
        );

        info!(decision_id = %decision.id, intent = %decision.intent, "decision emitted");
        EngineOutcome {
            decision: Some(decision),
            replayed: false,
        }
    }
}
