//! # Userdesk Config
//!
//! Configuration types for the Userdesk API, loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address and storage selection
//! - [`client`]: API client settings (base URL, token directory, timeout)
//!
//! # Example
//!
//! ```ignore
//! use userdesk_config::{JwtConfig, CorsConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod client;
pub mod cors;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use client::ClientConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
