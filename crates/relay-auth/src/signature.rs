// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 request body signature verification.
//!
//! The reference behavior is soft-fail: a mismatching signature is logged
//! but does not reject the request. That posture looks like a migration
//! compromise, so it is a policy here rather than hard-coded: `log-only`
//! keeps the lenient behavior, `enforce` rejects mismatches.
//!
//! The signature covers the raw request body and is keyed with the
//! presented API key, the one shared secret both sides hold.

use hmac::{Hmac, Mac};
use relay_core::RelayError;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// What to do when a supplied signature does not verify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignaturePolicy {
    /// Log the mismatch and let the request through (reference behavior).
    #[default]
    LogOnly,
    /// Reject the request as unauthorized.
    Enforce,
}

/// Compute the hex HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length; new_from_slice cannot fail for SHA-256.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"));
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex-encoded signature over `body`, in constant time.
pub fn verify(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"));
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Apply the configured policy to an optionally supplied signature header.
///
/// No header means nothing to check under either policy; the header is
/// optional in the wire contract.
pub fn check_signature(
    policy: SignaturePolicy,
    secret: &str,
    body: &[u8],
    signature_hex: Option<&str>,
) -> Result<(), RelayError> {
    let Some(signature) = signature_hex else {
        return Ok(());
    };

    if verify(secret, body, signature) {
        return Ok(());
    }

    match policy {
        SignaturePolicy::LogOnly => {
            warn!("body signature mismatch (log-only policy, request allowed)");
            Ok(())
        }
        SignaturePolicy::Enforce => {
            Err(RelayError::Unauthorized("body signature mismatch".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "rk_live_1";
    const BODY: &[u8] = br#"{"content":"hello","channelId":"c1"}"#;

    #[test]
    fn sign_verify_round_trip() {
        let sig = sign(SECRET, BODY);
        assert!(verify(SECRET, BODY, &sig));
    }

    #[test]
    fn verify_rejects_wrong_secret_and_body() {
        let sig = sign(SECRET, BODY);
        assert!(!verify("other-key", BODY, &sig));
        assert!(!verify(SECRET, b"tampered", &sig));
        assert!(!verify(SECRET, BODY, "not-hex!"));
    }

    #[test]
    fn missing_signature_passes_both_policies() {
        assert!(check_signature(SignaturePolicy::LogOnly, SECRET, BODY, None).is_ok());
        assert!(check_signature(SignaturePolicy::Enforce, SECRET, BODY, None).is_ok());
    }

    #[test]
    fn log_only_allows_mismatch() {
        let result = check_signature(SignaturePolicy::LogOnly, SECRET, BODY, Some("deadbeef"));
        assert!(result.is_ok());
    }

    #[test]
    fn enforce_rejects_mismatch() {
        let result = check_signature(SignaturePolicy::Enforce, SECRET, BODY, Some("deadbeef"));
        assert!(matches!(result, Err(RelayError::Unauthorized(_))));
    }

    #[test]
    fn enforce_accepts_valid_signature() {
        let sig = sign(SECRET, BODY);
        assert!(check_signature(SignaturePolicy::Enforce, SECRET, BODY, Some(&sig)).is_ok());
    }

    #[test]
    fn policy_parses_from_kebab_case() {
        let p: SignaturePolicy = serde_json::from_str(r#""log-only""#).unwrap();
        assert_eq!(p, SignaturePolicy::LogOnly);
        let p: SignaturePolicy = serde_json::from_str(r#""enforce""#).unwrap();
        assert_eq!(p, SignaturePolicy::Enforce);
    }
}
