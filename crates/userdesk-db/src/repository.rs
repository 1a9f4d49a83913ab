//! Storage collaborator contracts.
//!
//! Handlers only ever see these traits; the concrete store is chosen at
//! startup. Implementations must be thread-safe and serialize their own
//! conflicting writes.

use async_trait::async_trait;
use userdesk_models::{Role, User};

use crate::error::StorageResult;

/// A user to insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i64,
}

/// Field changes for an update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<i64>,
}

/// A user together with its stored password hash, for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by id.
    async fn list(&self) -> StorageResult<Vec<User>>;

    async fn get(&self, id: i64) -> StorageResult<Option<User>>;

    async fn find_credentials(&self, email: &str) -> StorageResult<Option<UserCredentials>>;

    /// Inserts a user and returns it with its assigned id.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if the email is taken.
    async fn create(&self, new_user: NewUser) -> StorageResult<User>;

    /// Applies `changes` and returns the updated user, or `None` if absent.
    async fn update(&self, id: i64, changes: UserChanges) -> StorageResult<Option<User>>;

    /// Removes a user. Returns `false` if there was nothing to remove.
    async fn delete(&self, id: i64) -> StorageResult<bool>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// All roles ordered by id.
    async fn list(&self) -> StorageResult<Vec<Role>>;

    async fn get(&self, id: i64) -> StorageResult<Option<Role>>;
}
