// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `relayd serve` command implementation.
//!
//! Wires the config-seeded stores, the Anthropic classifier, the decision
//! engine and the HTTP ingress together, then serves until the process is
//! stopped.

use std::sync::Arc;
use std::time::Duration;

use relay_anthropic::{AnthropicClassifier, ClientOptions};
use relay_auth::CredentialResolver;
use relay_config::RelayConfig;
use relay_core::{RelayError, UsageSink};
use relay_engine::{EngineDeps, RelayEngine};
use relay_gateway::{GatewayState, ServerConfig};
use relay_memory::{InMemoryConversations, InMemoryDecisionCache};
use tracing::info;

use crate::stores::{HttpUsageSink, NoopUsageSink, NullKeyStore, SeededCatalog, SeededConfigStore};

/// Runs the `relayd serve` command.
pub async fn run_serve(config: RelayConfig) -> Result<(), RelayError> {
    init_tracing(&config.engine.log_level);

    info!("starting relayd serve");

    let api_key = config
        .anthropic
        .api_key
        .clone()
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        .ok_or_else(|| {
            eprintln!(
                "error: no Anthropic API key configured. \
                 Set anthropic.api_key in relay.toml or the ANTHROPIC_API_KEY environment variable."
            );
            RelayError::Config("missing Anthropic API key".into())
        })?;

    let provider = AnthropicClassifier::new(ClientOptions {
        api_key,
        api_version: config.anthropic.api_version.clone(),
        model: config.anthropic.model.clone(),
        max_tokens: config.anthropic.max_tokens,
        request_timeout: Duration::from_secs(config.anthropic.request_timeout_secs),
        max_retries: config.anthropic.max_retries,
    })?;
    info!(model = provider.model(), "classifier provider initialized");

    let usage: Arc<dyn UsageSink> = match &config.usage.endpoint {
        Some(endpoint) => {
            info!(endpoint, "usage reporting enabled");
            Arc::new(HttpUsageSink::new(
                endpoint.clone(),
                config.usage.auth_token.clone(),
            ))
        }
        None => Arc::new(NoopUsageSink),
    };

    let catalog = Arc::new(SeededCatalog::new(&config.mappings, &config.personas));
    let deps = EngineDeps {
        config_store: Arc::new(SeededConfigStore::new(&config.bots)),
        catalog: catalog.clone(),
        personas: catalog,
        provider: Arc::new(provider),
        usage,
        conversations: Arc::new(InMemoryConversations::new()),
        decisions: Arc::new(InMemoryDecisionCache::with_ttl(Duration::from_secs(
            config.engine.decision_ttl_secs,
        ))),
    };
    let engine = RelayEngine::with_classify_timeout(
        deps,
        Duration::from_secs(config.engine.classify_timeout_secs),
    );

    let resolver = CredentialResolver::new(Arc::new(NullKeyStore))
        .with_static_entries(&config.auth.static_keys);

    let state = GatewayState::new(
        Arc::new(engine),
        Arc::new(resolver),
        config.auth.signature_policy,
    );

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    relay_gateway::start_server(&server_config, state).await
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("relayd={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
