//! # Userdesk DB
//!
//! Storage for the Userdesk API: the [`UserRepository`] and
//! [`RoleRepository`] contracts plus two implementations.
//!
//! - [`MemoryStore`]: process-local maps, used without `DATABASE_URL` and in tests
//! - [`PgStore`]: PostgreSQL through an SQLx pool, migrated on [`connect`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use userdesk_db::{PgStore, UserRepository, connect};
//!
//! let pool = connect(&database_url).await?;
//! let users: Arc<dyn UserRepository> = Arc::new(PgStore::new(pool));
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use postgres::{PgStore, connect};
pub use repository::{NewUser, RoleRepository, UserChanges, UserCredentials, UserRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;
