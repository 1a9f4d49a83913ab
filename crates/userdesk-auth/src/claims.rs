//! JWT claim structures and the request-scoped identity derived from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use userdesk_core::AppError;

/// JWT claims for access tokens.
///
/// The role name travels inside the token so the role gate can decide
/// without a storage lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Name of the user's role, e.g. `admin`
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// Who is making the current request. Lives only for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: String,
}

impl Claims {
    pub fn identity(&self) -> Result<Identity, AppError> {
        let user_id = self
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))?;

        Ok(Identity {
            user_id,
            role: self.role.clone(),
        })
    }
}
