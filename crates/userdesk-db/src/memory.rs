//! In-memory store used when no database is configured, and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use userdesk_models::{Role, User, system_roles};

use crate::error::{StorageError, StorageResult};
use crate::repository::{NewUser, RoleRepository, UserChanges, UserCredentials, UserRepository};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, StoredUser>,
    next_id: i64,
}

#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    roles: Vec<Role>,
}

impl MemoryStore {
    /// An empty store holding the seeded `admin` and `user` roles.
    pub fn new() -> Self {
        Self::with_roles(vec![
            Role {
                id: system_roles::ADMIN,
                name: system_roles::slugs::ADMIN.to_string(),
            },
            Role {
                id: system_roles::USER,
                name: system_roles::slugs::USER.to_string(),
            },
        ])
    }

    pub fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                users: BTreeMap::new(),
                next_id: 1,
            }),
            roles,
        }
    }

    fn check_role(&self, role_id: i64) -> StorageResult<()> {
        if self.roles.iter().any(|r| r.id == role_id) {
            Ok(())
        } else {
            Err(StorageError::InvalidData(format!(
                "role {} does not exist",
                role_id
            )))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<i64>) -> bool {
    tables
        .users
        .values()
        .any(|s| s.user.email.eq_ignore_ascii_case(email) && Some(s.user.id) != except)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> StorageResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().map(|s| s.user.clone()).collect())
    }

    async fn get(&self, id: i64) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|s| s.user.clone()))
    }

    async fn find_credentials(&self, email: &str) -> StorageResult<Option<UserCredentials>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|s| s.user.email.eq_ignore_ascii_case(email))
            .map(|s| UserCredentials {
                user: s.user.clone(),
                password_hash: s.password_hash.clone(),
            }))
    }

    async fn create(&self, new_user: NewUser) -> StorageResult<User> {
        self.check_role(new_user.role_id)?;

        let mut tables = self.tables.write().await;
        if email_taken(&tables, &new_user.email, None) {
            return Err(StorageError::duplicate("User", "email", new_user.email));
        }

        let id = tables.next_id;
        tables.next_id += 1;

        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            role_id: new_user.role_id,
        };
        tables.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );

        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> StorageResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }

        if let Some(role_id) = changes.role_id {
            self.check_role(role_id)?;
        }
        if let Some(email) = &changes.email {
            if email_taken(&tables, email, Some(id)) {
                return Err(StorageError::duplicate("User", "email", email.clone()));
            }
        }

        let Some(stored) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            stored.user.name = name;
        }
        if let Some(email) = changes.email {
            stored.user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            stored.password_hash = password_hash;
        }
        if let Some(role_id) = changes.role_id {
            stored.user.role_id = role_id;
        }

        Ok(Some(stored.user.clone()))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.remove(&id).is_some())
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn list(&self) -> StorageResult<Vec<Role>> {
        let mut roles = self.roles.clone();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Role>> {
        Ok(self.roles.iter().find(|r| r.id == id).cloned())
    }
}
