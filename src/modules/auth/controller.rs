use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use userdesk_core::{AppError, ErrorResponse};
use userdesk_models::{CreateUserDto, LoginRequest, LoginResponse, UserEnvelope};

use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User registered successfully", body = UserEnvelope),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error or unknown role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    let user = AuthService::register_user(state.users.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User registered successfully".to_string(),
            data: user,
        }),
    ))
}

/// Login and receive a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(
        state.users.as_ref(),
        state.roles.as_ref(),
        dto,
        &state.jwt_config,
    )
    .await?;
    Ok(Json(response))
}
