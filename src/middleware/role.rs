//! Role-based authorization.
//!
//! Every check here takes an [`AuthUser`], so a role decision can only be
//! made after authentication succeeded. Use the [`RequireAdmin`] extractor in
//! handlers, or [`authorize`] for manual checks in controller logic.

use axum::{extract::FromRequestParts, http::request::Parts};
use userdesk_core::AppError;
use userdesk_models::system_roles;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Allows the request only if the caller holds exactly `required_role`.
///
/// # Example
///
/// ```rust,ignore
/// use crate::middleware::role::authorize;
///
/// pub async fn handler(auth_user: AuthUser) -> Result<Json<Response>, AppError> {
///     authorize(&auth_user, "admin")?;
///     // Handler logic
/// }
/// ```
pub fn authorize(auth_user: &AuthUser, required_role: &str) -> Result<(), AppError> {
    if auth_user.role() == required_role {
        return Ok(());
    }

    tracing::warn!(
        user_id = auth_user.user_id(),
        role = %auth_user.role(),
        required = %required_role,
        "Role check failed"
    );
    Err(AppError::forbidden(format!(
        "Access denied. Required role: {}",
        required_role
    )))
}

/// Extractor for admin-only handlers. Authenticates first, then checks the
/// role, so a missing token is still a 401 rather than a 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        authorize(&auth_user, system_roles::slugs::ADMIN)?;
        Ok(RequireAdmin(auth_user))
    }
}
