//! Client side of Userdesk.
//!
//! [`ApiClient`] issues typed calls and owns the bearer-token policy,
//! [`ClientStore`] keeps the synchronized local view of users and roles.
//! The network is reached through the [`Transport`] trait so the store can
//! run against [`HttpTransport`] or an in-process router.

pub mod api;
pub mod error;
pub mod normalize;
pub mod store;
pub mod token;
pub mod transport;

pub use api::ApiClient;
pub use error::ClientError;
pub use normalize::resolve_data;
pub use store::{ClientStore, StoreState};
pub use token::{FileTokenStorage, MemoryTokenStorage, TOKEN_KEY, TokenStorage};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
