use axum::{Json, extract::State};
use tracing::instrument;
use userdesk_core::{AppError, ErrorResponse};
use userdesk_models::Role;

use crate::middleware::auth::AuthUser;
use crate::modules::roles::service::RoleService;
use crate::state::AppState;

/// List all roles
#[utoipa::path(
    get,
    path = "/roles",
    responses(
        (status = 200, description = "List of roles ordered by id", body = Vec<Role>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn get_roles(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Role>>, AppError> {
    let roles = RoleService::get_roles(state.roles.as_ref()).await?;
    Ok(Json(roles))
}
