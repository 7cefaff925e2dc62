// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes and shared state for the ingress.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use relay_auth::{CredentialResolver, SignaturePolicy};
use relay_core::RelayError;
use relay_engine::RelayEngine;
use tower_http::cors::CorsLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The decision pipeline.
    pub engine: Arc<RelayEngine>,
    /// API key resolution.
    pub resolver: Arc<CredentialResolver>,
    /// Body signature policy.
    pub signature_policy: SignaturePolicy,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

impl GatewayState {
    pub fn new(
        engine: Arc<RelayEngine>,
        resolver: Arc<CredentialResolver>,
        signature_policy: SignaturePolicy,
    ) -> Self {
        Self {
            engine,
            resolver,
            signature_policy,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors GatewayConfig from relay-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// - `POST /v1/decide` (API key auth inside the handler, raw body for HMAC)
/// - `GET /health` (public, for process supervisors)
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/decide", post(handlers::post_decide))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), RelayError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| RelayError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8787,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
