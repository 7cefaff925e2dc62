// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for the relay decision engine: API key resolution against
//! the key store (with a legacy static-map fallback) and HMAC-SHA256 body
//! signature verification under a configurable soft-fail policy.

pub mod resolver;
pub mod signature;

pub use resolver::CredentialResolver;
pub use signature::{check_signature, sign, verify, SignaturePolicy};
