//! Signature-free expiry check for bearer tokens.
//!
//! The client uses this before sending a request so it never presents a
//! token it already knows is dead. It only reads the payload; the server
//! remains the authority on signatures via [`crate::jwt::verify_token`].

use chrono::Utc;
use data_encoding::{BASE64_NOPAD, BASE64URL_NOPAD};
use serde_json::Value;

/// How a token whose payload cannot be read is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Unreadable tokens count as expired.
    FailClosed,
}

impl DecodePolicy {
    const fn treat_as_expired(self) -> bool {
        match self {
            DecodePolicy::FailClosed => true,
        }
    }
}

/// The policy applied by [`is_token_expired`].
pub const DECODE_POLICY: DecodePolicy = DecodePolicy::FailClosed;

/// Reads the `exp` claim (seconds since epoch) from a token's payload.
///
/// Returns `None` if the token does not have three segments, the payload is
/// not base64, not JSON, or carries no numeric `exp`.
pub fn decode_expiry(token: &str) -> Option<f64> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = segments[1].trim_end_matches('=').as_bytes();
    let bytes = BASE64URL_NOPAD
        .decode(payload)
        .or_else(|_| BASE64_NOPAD.decode(payload))
        .ok()?;

    let json: Value = serde_json::from_slice(&bytes).ok()?;
    json.get("exp")?.as_f64()
}

/// Whether `token` is absent, unreadable or past its expiry at `now_millis`.
pub fn is_token_expired_at(token: Option<&str>, now_millis: i64) -> bool {
    let Some(token) = token else {
        return true;
    };

    match decode_expiry(token) {
        Some(exp) => exp * 1000.0 < now_millis as f64,
        None => {
            tracing::debug!("Token payload unreadable");
            DECODE_POLICY.treat_as_expired()
        }
    }
}

/// Whether `token` is absent, unreadable or past its expiry right now.
pub fn is_token_expired(token: Option<&str>) -> bool {
    is_token_expired_at(token, Utc::now().timestamp_millis())
}
