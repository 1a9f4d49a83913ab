use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use userdesk_auth::{Claims, Identity, verify_token};
use userdesk_core::AppError;

use crate::state::AppState;

/// Extractor that validates the bearer token and yields the caller's identity.
///
/// There is no public constructor: the only way to hold an `AuthUser` is to
/// have passed token verification for the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    claims: Claims,
    identity: Identity,
}

impl AuthUser {
    fn from_claims(claims: Claims) -> Result<Self, AppError> {
        let identity = claims.identity()?;
        Ok(Self { claims, identity })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> i64 {
        self.identity.user_id
    }

    pub fn role(&self) -> &str {
        &self.identity.role
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let result = bearer_token(parts)
            .and_then(|token| verify_token(token, &state.jwt_config))
            .and_then(AuthUser::from_claims);

        if let Err(err) = &result {
            tracing::debug!(path = %parts.uri.path(), reason = %err.error, "Authentication rejected");
        }

        result
    }
}

#[cfg(test)]
pub(crate) fn test_auth_user(user_id: i64, role: &str) -> AuthUser {
    AuthUser {
        claims: Claims {
            sub: user_id.to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        },
        identity: Identity {
            user_id,
            role: role.to_string(),
        },
    }
}
