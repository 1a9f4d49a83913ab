//! Role domain model and the well-known system roles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// Roles seeded by the initial migration. Their ids are fixed.
pub mod system_roles {
    pub mod slugs {
        pub const ADMIN: &str = "admin";
        pub const USER: &str = "user";
    }

    /// Full access, including user mutations
    pub const ADMIN: i64 = 1;
    /// Read-only access
    pub const USER: i64 = 2;

    /// Role assigned when a registration names none
    pub const DEFAULT: i64 = USER;
}
