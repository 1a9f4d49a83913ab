//! JWT creation and verification for the server side.
//!
//! Tokens are HS256-signed with the configured secret. Verification checks
//! the signature and `exp`; every failure collapses into one unauthorized
//! error so callers cannot tell a forged token from an expired one.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use userdesk_config::JwtConfig;
use userdesk_core::AppError;

use crate::claims::Claims;

/// Creates an access token carrying the user's id, email and role name.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    user_id: i64,
    email: &str,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token
/// has expired or it is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        AppError::unauthorized("Invalid or expired token")
    })
}
