use std::sync::Arc;

use userdesk_config::{CorsConfig, JwtConfig, ServerConfig};
use userdesk_db::{MemoryStore, PgStore, RoleRepository, StorageResult, UserRepository, connect};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// State backed by a fresh [`MemoryStore`] holding only the seeded roles.
    pub fn in_memory(jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            roles: store,
            jwt_config,
            cors_config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &"<redacted>")
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

/// Builds the state for `config`: Postgres when `DATABASE_URL` is set,
/// the in-memory store otherwise.
pub async fn init_app_state(config: &ServerConfig) -> StorageResult<AppState> {
    let jwt_config = JwtConfig::from_env();
    let cors_config = CorsConfig::from_env();

    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using the in-memory store");
        return Ok(AppState::in_memory(jwt_config, cors_config));
    };

    let store = Arc::new(PgStore::new(connect(database_url).await?));
    Ok(AppState {
        users: store.clone(),
        roles: store,
        jwt_config,
        cors_config,
    })
}
