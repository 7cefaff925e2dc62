// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the relay ingress.
//!
//! `POST /v1/decide` consumes the raw body so the HMAC check covers the
//! exact bytes the caller signed, then deserializes the inbound event and
//! runs the pipeline.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use relay_core::{Decision, InboundEvent, RelayError};
use relay_engine::EngineRequest;
use serde::Serialize;
use tracing::debug;

use crate::server::GatewayState;

/// Response body for `POST /v1/decide`.
#[derive(Debug, Serialize)]
pub struct DecideResponse {
    /// The decision, or `null` when the pipeline chose to stay silent.
    pub decision: Option<Decision>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn error_response(err: RelayError) -> Response {
    let status = match &err {
        RelayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        RelayError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
        RelayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// POST /v1/decide
///
/// Headers: `x-api-key` (required), `x-signature` (optional HMAC-SHA256 hex
/// over the raw body), `x-idempotency-key` (optional). The response echoes
/// the decision id in `x-decision-id` when a decision is emitted.
pub async fn post_decide(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(api_key) = header_str(&headers, "x-api-key") else {
        return error_response(RelayError::Unauthorized("missing x-api-key header".into()));
    };

    let identity = match state.resolver.resolve(api_key).await {
        Ok(identity) => identity,
        Err(err) => return error_response(err),
    };

    let signature = header_str(&headers, "x-signature");
    if let Err(err) =
        relay_auth::check_signature(state.signature_policy, api_key, &body, signature)
    {
        return error_response(err);
    }

    let event: InboundEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            return error_response(RelayError::InvalidEvent(format!(
                "malformed event body: {err}"
            )));
        }
    };

    let idempotency_key = header_str(&headers, "x-idempotency-key").map(str::to_string);

    let outcome = match state
        .engine
        .handle(EngineRequest {
            identity,
            event,
            idempotency_key,
        })
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => return error_response(err),
    };

    debug!(
        replayed = outcome.replayed,
        has_decision = outcome.decision.is_some(),
        "decide request handled"
    );

    let mut response_headers = HeaderMap::new();
    if let Some(decision) = &outcome.decision
        && let Ok(value) = decision.id.parse()
    {
        response_headers.insert("x-decision-id", value);
    }

    (
        StatusCode::OK,
        response_headers,
        Json(DecideResponse {
            decision: outcome.decision,
        }),
    )
        .into_response()
}

/// GET /health
///
/// Unauthenticated liveness probe for process supervisors.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_response_serializes_null_decision() {
        let json = serde_json::to_string(&DecideResponse { decision: None }).unwrap();
        assert_eq!(json, r#"{"decision":null}"#);
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "something went wrong".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("something went wrong"));
    }
}
