//! PostgreSQL store backed by an SQLx connection pool.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use userdesk_models::{Role, User};

use crate::error::{StorageError, StorageResult};
use crate::repository::{NewUser, RoleRepository, UserChanges, UserCredentials, UserRepository};

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connects to Postgres and applies pending migrations.
pub async fn connect(database_url: &str) -> StorageResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;

    tracing::info!("Database connected and migrated");
    Ok(pool)
}

fn map_write_error(err: sqlx::Error, email: &str) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StorageError::duplicate("User", "email", email);
        }
        if db_err.is_foreign_key_violation() {
            return StorageError::InvalidData("role does not exist".to_string());
        }
    }
    StorageError::Query(err.to_string())
}

fn query_error(err: sqlx::Error) -> StorageError {
    StorageError::Query(err.to_string())
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    name: String,
    email: String,
    role_id: i64,
    password_hash: String,
}

#[async_trait]
impl UserRepository for PgStore {
    async fn list(&self) -> StorageResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, email, role_id FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn get(&self, id: i64) -> StorageResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, email, role_id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn find_credentials(&self, email: &str) -> StorageResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, name, email, role_id, password_hash
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(row.map(|r| UserCredentials {
            user: User {
                id: r.id,
                name: r.name,
                email: r.email,
                role_id: r.role_id,
            },
            password_hash: r.password_hash,
        }))
    }

    async fn create(&self, new_user: NewUser) -> StorageResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role_id
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &new_user.email))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> StorageResult<Option<User>> {
        let email = changes.email.clone().unwrap_or_default();

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                role_id = COALESCE($5, role_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, role_id
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &email))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RoleRepository for PgStore {
    async fn list(&self) -> StorageResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)
    }
}
