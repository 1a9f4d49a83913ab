//! Request gates.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor, which turns a bearer token
//!   into a verified identity or rejects with 401
//! - [`role`]: role checks that can only run on an [`auth::AuthUser`]
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireAdmin;
//!
//! // Any valid token
//! async fn list(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! // Valid token and the admin role
//! async fn delete(RequireAdmin(auth_user): RequireAdmin) -> impl IntoResponse { /* ... */ }
//! ```

pub mod auth;
pub mod role;
