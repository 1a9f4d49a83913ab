//! # Userdesk Core
//!
//! Core types, errors, and utilities for the Userdesk API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use userdesk_core::{AppError, hash_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("User not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorResponse};
pub use password::{hash_password, verify_password};
