//! # Userdesk Models
//!
//! Domain models and DTOs for the Userdesk API.
//!
//! - [`auth`]: Login request/response
//! - [`roles`]: Role model and the seeded system roles
//! - [`users`]: User model plus create/update DTOs

pub mod auth;
pub mod roles;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginRequest, LoginResponse, MessageResponse};
pub use roles::{Role, system_roles};
pub use users::{CreateUserDto, UpdateUserDto, User, UserEnvelope};
