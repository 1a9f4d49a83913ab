//! User domain models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A user as exposed by the API.
///
/// The password hash is stored alongside but never part of this struct,
/// so it cannot leak through serialization.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_id: i64,
}

/// DTO for creating a user, shared by admin creation and self-registration.
///
/// When `role_id` is omitted the user gets the `user` role.
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password123")]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
}

/// DTO for updating a user. Absent fields keep their stored value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
}

/// A user wrapped with a human-readable message, as returned by
/// registration and update.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub data: User,
}
