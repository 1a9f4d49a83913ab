//! # Userdesk Auth
//!
//! Authentication types and token utilities for the Userdesk API.
//!
//! - [`claims`]: JWT claims and the request-scoped [`Identity`]
//! - [`jwt`]: Server-side token creation and signature verification
//! - [`validator`]: Payload-only expiry check used by clients before sending
//!
//! # Example
//!
//! ```ignore
//! use userdesk_auth::{create_access_token, verify_token, is_token_expired};
//! use userdesk_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(1, "admin@example.com", "admin", &config)?;
//!
//! assert!(!is_token_expired(Some(&token)));
//! let identity = verify_token(&token, &config)?.identity()?;
//! ```

pub mod claims;
pub mod jwt;
pub mod validator;

// Re-export commonly used types at crate root
pub use claims::{Claims, Identity};
pub use jwt::{create_access_token, verify_token};
pub use validator::{DECODE_POLICY, DecodePolicy, decode_expiry, is_token_expired, is_token_expired_at};
