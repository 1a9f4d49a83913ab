use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use userdesk_core::{AppError, ErrorResponse};
use userdesk_models::{CreateUserDto, MessageResponse, UpdateUserDto, User, UserEnvelope};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all users
#[utoipa::path(
    get,
    path = "/usuarios",
    responses(
        (status = 200, description = "List of users ordered by id", body = Vec<User>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::get_users(state.users.as_ref()).await?;
    Ok(Json(users))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/usuarios/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), id).await?;
    Ok(Json(user))
}

/// Create a user (admin only)
#[utoipa::path(
    post,
    path = "/usuarios",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(state.users.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user (admin only)
#[utoipa::path(
    put,
    path = "/usuarios/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserEnvelope>, AppError> {
    let user = UserService::update_user(state.users.as_ref(), id, dto).await?;
    Ok(Json(UserEnvelope {
        message: "User updated successfully".to_string(),
        data: user,
    }))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/usuarios/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_user(state.users.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
