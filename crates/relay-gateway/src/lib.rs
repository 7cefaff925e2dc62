// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP ingress for the relay decision engine.
//!
//! One authenticated operation, `POST /v1/decide`, plus a public health
//! probe. Authentication (API key resolution and HMAC body signature)
//! happens inside the decide handler because the HMAC must cover the raw
//! request bytes.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
