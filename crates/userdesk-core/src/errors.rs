//! Application error type with HTTP response conversion.
//!
//! Every failure surfaced by a handler is an [`AppError`]: an HTTP status plus
//! the underlying [`anyhow::Error`]. The response body is always
//! `{"error": "<message>"}`. Server-side faults (5xx) are logged in full and
//! answered with a generic message so storage details never reach the client.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

/// Body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    /// The message sent to the client.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = Json(json!({
            "error": self.public_message()
        }));

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_status() {
        assert_eq!(
            AppError::unauthorized("no token").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("nope").status, StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::not_found(anyhow!("missing")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::unprocessable(anyhow!("bad")).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::conflict(anyhow!("dup")).status,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::not_found(anyhow!("User with id 3 not found"));
        assert_eq!(err.public_message(), "User with id 3 not found");
    }

    #[test]
    fn test_server_errors_hide_message() {
        let err = AppError::internal_error("connection refused on 10.0.0.4:5432");
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::forbidden("Administrator privileges required").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
