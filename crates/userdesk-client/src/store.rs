//! The client's synchronized local view of users and roles.
//!
//! A [`ClientStore`] is created once per session by the composition root and
//! handed to whatever renders it. Its operations never fail outward: each one
//! raises `loading`, clears `error`, issues one request, patches the local
//! collections from the response (or records the failure) and finally drops
//! `loading`. Nothing is applied optimistically.
//!
//! Operations take `&self` and may overlap. There is no sequencing between
//! them, so when two mutations race the one that completes last decides the
//! final state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use userdesk_models::{CreateUserDto, Role, UpdateUserDto, User};

use crate::api::{ApiClient, to_body};
use crate::error::ClientError;
use crate::normalize::{decode_list, merge_fields, single_item, update_source};
use crate::transport::Transport;

/// Everything a view needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Clears `loading` when dropped, whichever way the operation ends.
struct LoadingGuard<'a> {
    state: &'a Mutex<StoreState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .loading = false;
    }
}

pub struct ClientStore<T> {
    api: ApiClient<T>,
    state: Mutex<StoreState>,
}

impl<T: Transport> ClientStore<T> {
    /// Creates an empty store. Call [`ClientStore::init`] to load data.
    pub fn new(api: ApiClient<T>) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    /// Initial load: fetches users and roles concurrently, once.
    ///
    /// Both fetches share the `loading` flag, so it drops back to false as
    /// soon as the first of the two finishes.
    pub async fn init(&self) {
        tokio::join!(self.fetch_users(), self.fetch_roles());
    }

    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.lock().roles.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub async fn fetch_users(&self) {
        let _loading = self.begin();
        let result = async { decode_list::<User>(self.api.list_users().await?) }.await;

        match result {
            Ok(users) => self.lock().users = users,
            Err(err) => self.fail("fetch users", err),
        }
    }

    pub async fn fetch_roles(&self) {
        let _loading = self.begin();
        let result = async { decode_list::<Role>(self.api.list_roles().await?) }.await;

        match result {
            Ok(roles) => self.lock().roles = roles,
            Err(err) => self.fail("fetch roles", err),
        }
    }

    /// Registers a user and appends the entity the server returns.
    pub async fn create_user(&self, payload: &CreateUserDto) {
        let _loading = self.begin();
        let result = async {
            let body = self.api.register(payload).await?;
            let item = single_item(body)
                .ok_or_else(|| ClientError::Transport("response carried no user".to_string()))?;
            decode_user(item)
        }
        .await;

        match result {
            Ok(user) => self.lock().users.push(user),
            Err(err) => self.fail("create user", err),
        }
    }

    /// Updates a user and merges the server's answer into the local copy,
    /// falling back to `payload` when the server sends nothing usable.
    pub async fn update_user(&self, id: i64, payload: &UpdateUserDto) {
        let _loading = self.begin();
        let result = async {
            let submitted = to_body(payload)?;
            let body = self.api.update_user(id, submitted.clone()).await?;
            Ok::<_, ClientError>(update_source(body, &submitted))
        }
        .await;

        let fields = match result {
            Ok(fields) => fields,
            Err(err) => return self.fail("update user", err),
        };

        let mut state = self.lock();
        let Some(index) = state.users.iter().position(|u| u.id == id) else {
            tracing::debug!(id, "Updated user is not in the local list");
            return;
        };

        let merged = serde_json::to_value(&state.users[index])
            .map_err(|e| ClientError::Transport(e.to_string()))
            .and_then(|mut local| {
                merge_fields(&mut local, fields, id);
                decode_user(local)
            });

        match merged {
            Ok(user) => state.users[index] = user,
            Err(err) => {
                drop(state);
                self.fail("update user", err);
            }
        }
    }

    /// Deletes a user and drops it from the local list.
    pub async fn delete_user(&self, id: i64) {
        let _loading = self.begin();

        match self.api.delete_user(id).await {
            Ok(_) => self.lock().users.retain(|u| u.id != id),
            Err(err) => self.fail("delete user", err),
        }
    }

    /// Logs in and stores the token. Returns whether it worked; a failure is
    /// also recorded in `error`.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let _loading = self.begin();

        match self.api.login(email, password).await {
            Ok(login) => {
                tracing::info!(user_id = login.user.id, "Logged in");
                true
            }
            Err(err) => {
                self.fail("login", err);
                false
            }
        }
    }

    /// Ends the session: forgets the token and the local collections.
    pub fn logout(&self) {
        self.api.tokens().remove();
        *self.lock() = StoreState::default();
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> LoadingGuard<'_> {
        let mut state = self.lock();
        state.loading = true;
        state.error = None;
        LoadingGuard { state: &self.state }
    }

    fn fail(&self, operation: &str, err: ClientError) {
        tracing::warn!(operation, error = %err, "Request failed");
        self.lock().error = Some(err.to_string());
    }
}

fn decode_user(value: Value) -> Result<User, ClientError> {
    serde_json::from_value(value)
        .map_err(|e| ClientError::Transport(format!("unexpected user shape: {}", e)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::token::{MemoryTokenStorage, TokenStorage};
    use crate::transport::{ApiRequest, ApiResponse};

    type Handler = dyn Fn(&ApiRequest) -> (Duration, ApiResponse) + Send + Sync;

    /// Answers each request through a closure and records what was sent.
    struct FakeTransport {
        handler: Box<Handler>,
        sent: Mutex<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        fn new(
            handler: impl Fn(&ApiRequest) -> (Duration, ApiResponse) + Send + Sync + 'static,
        ) -> Self {
            Self {
                handler: Box::new(handler),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
            let (delay, response) = (self.handler)(&request);
            self.sent.lock().unwrap().push(request);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(response)
        }
    }

    fn reply(status: u16, body: Value) -> (Duration, ApiResponse) {
        (Duration::ZERO, ApiResponse { status, body })
    }

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role_id: 2,
        }
    }

    fn store_with(
        transport: FakeTransport,
        tokens: Arc<dyn TokenStorage>,
    ) -> ClientStore<FakeTransport> {
        ClientStore::new(ApiClient::new(transport, tokens))
    }

    fn seeded(store: &ClientStore<FakeTransport>, users: Vec<User>) {
        store.lock().users = users;
    }

    #[tokio::test]
    async fn test_fetch_users_replaces_items_from_envelope() {
        let transport = FakeTransport::new(|_| {
            reply(200, json!({"data": [{"id": 1, "name": "Ana", "email": "ana@example.com", "role_id": 1}]}))
        });
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(9, "Old")]);

        store.fetch_users().await;

        let state = store.snapshot();
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].name, "Ana");
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_fetch_users_failure_records_error_and_keeps_items() {
        let transport =
            FakeTransport::new(|_| reply(401, json!({"error": "Missing authorization header"})));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(1, "Ana")]);

        store.fetch_users().await;

        let state = store.snapshot();
        assert_eq!(state.users, vec![user(1, "Ana")]);
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Unauthenticated: Missing authorization header")
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_dropped_and_not_sent() {
        let transport = FakeTransport::new(|_| reply(200, json!([])));
        // Payload {"exp":1} base64url-encoded.
        let tokens = Arc::new(MemoryTokenStorage::with_token("x.eyJleHAiOjF9.y"));
        let store = store_with(transport, tokens.clone());

        store.fetch_roles().await;

        assert_eq!(tokens.load(), None);
        let sent = store.api().transport().sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer, None);
    }

    #[tokio::test]
    async fn test_unauthenticated_reply_discards_token() {
        let transport = FakeTransport::new(|_| reply(401, json!({"error": "Invalid or expired token"})));
        // Payload {"exp":99999999999}: far future, so it is sent.
        let tokens = Arc::new(MemoryTokenStorage::with_token("x.eyJleHAiOjk5OTk5OTk5OTk5fQ.y"));
        let store = store_with(transport, tokens.clone());

        store.fetch_users().await;

        let sent = store.api().transport().sent.lock().unwrap().clone();
        assert_eq!(sent[0].bearer.as_deref(), Some("x.eyJleHAiOjk5OTk5OTk5OTk5fQ.y"));
        assert_eq!(tokens.load(), None);
        assert!(store.error().unwrap().starts_with("Unauthenticated"));
    }

    #[tokio::test]
    async fn test_create_user_appends_created_entity() {
        let transport = FakeTransport::new(|request| {
            assert_eq!(request.method, Method::POST);
            assert_eq!(request.path, "/auth/register");
            reply(
                201,
                json!({"message": "User registered", "data": {"id": 5, "name": "Eva", "email": "eva@example.com", "role_id": 2}}),
            )
        });
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(1, "Ana")]);

        store
            .create_user(&CreateUserDto {
                name: "Eva".to_string(),
                email: "eva@example.com".to_string(),
                password: "pw".to_string(),
                role_id: None,
            })
            .await;

        let ids: Vec<i64> = store.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_create_user_accepts_bare_array() {
        let transport = FakeTransport::new(|_| {
            reply(201, json!([{"id": 6, "name": "Flo", "email": "flo@example.com", "role_id": 2}]))
        });
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));

        store
            .create_user(&CreateUserDto {
                name: "Flo".to_string(),
                email: "flo@example.com".to_string(),
                password: "pw".to_string(),
                role_id: None,
            })
            .await;

        assert_eq!(store.users()[0].id, 6);
    }

    #[tokio::test]
    async fn test_create_user_without_entity_records_error() {
        let transport = FakeTransport::new(|_| reply(201, Value::Null));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(1, "Ana")]);

        store
            .create_user(&CreateUserDto {
                name: "Eva".to_string(),
                email: "eva@example.com".to_string(),
                password: "pw".to_string(),
                role_id: None,
            })
            .await;

        assert_eq!(store.users(), vec![user(1, "Ana")]);
        assert_eq!(
            store.error().as_deref(),
            Some("Transport error: response carried no user")
        );
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_create_user_failure_leaves_items() {
        let transport =
            FakeTransport::new(|_| reply(422, json!({"error": "email must be a valid email address"})));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(1, "Ana")]);

        store
            .create_user(&CreateUserDto {
                name: "Bad".to_string(),
                email: "nope".to_string(),
                password: "pw".to_string(),
                role_id: None,
            })
            .await;

        assert_eq!(store.users(), vec![user(1, "Ana")]);
        assert!(store.error().unwrap().starts_with("Validation error"));
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_update_user_merges_server_fields() {
        let transport = FakeTransport::new(|request| {
            assert_eq!(request.path, "/usuarios/7");
            assert_eq!(request.body, Some(json!({"name": "X"})));
            reply(200, json!({"data": {"name": "X"}}))
        });
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(3, "Cid"), user(7, "Gus")]);

        store
            .update_user(
                7,
                &UpdateUserDto {
                    name: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let users = store.users();
        assert_eq!(users[0], user(3, "Cid"));
        assert_eq!(users[1].id, 7);
        assert_eq!(users[1].name, "X");
        assert_eq!(users[1].email, "gus@example.com");
        assert_eq!(users[1].role_id, 2);
    }

    #[tokio::test]
    async fn test_update_user_falls_back_to_payload_on_empty_reply() {
        let transport = FakeTransport::new(|_| reply(204, Value::Null));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(7, "Gus")]);

        store
            .update_user(
                7,
                &UpdateUserDto {
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(store.users()[0].email, "new@example.com");
        assert_eq!(store.users()[0].name, "Gus");
    }

    #[tokio::test]
    async fn test_update_user_ignores_server_id() {
        let transport = FakeTransport::new(|_| reply(200, json!({"data": {"id": 99, "name": "X"}})));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(7, "Gus")]);

        store
            .update_user(7, &UpdateUserDto { name: Some("X".to_string()), ..Default::default() })
            .await;

        assert_eq!(store.users()[0].id, 7);
    }

    #[tokio::test]
    async fn test_update_user_failure_changes_nothing() {
        let transport = FakeTransport::new(|_| reply(403, json!({"error": "Administrator privileges required"})));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(7, "Gus")]);

        store
            .update_user(7, &UpdateUserDto { name: Some("X".to_string()), ..Default::default() })
            .await;

        assert_eq!(store.users(), vec![user(7, "Gus")]);
        assert_eq!(
            store.error().as_deref(),
            Some("Forbidden: Administrator privileges required")
        );
    }

    #[tokio::test]
    async fn test_delete_user_twice() {
        let deleted = Arc::new(Mutex::new(false));
        let flag = deleted.clone();
        let transport = FakeTransport::new(move |_| {
            let mut gone = flag.lock().unwrap();
            if *gone {
                reply(404, json!({"error": "User with id 3 not found"}))
            } else {
                *gone = true;
                reply(200, json!({"message": "User deleted"}))
            }
        });
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(1, "Ana"), user(3, "Cid")]);

        store.delete_user(3).await;
        assert_eq!(store.users(), vec![user(1, "Ana")]);
        assert_eq!(store.error(), None);

        store.delete_user(3).await;
        assert_eq!(store.users(), vec![user(1, "Ana")]);
        assert!(store.error().unwrap().to_lowercase().contains("not found"));
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_transport_failure_is_captured() {
        struct Down;
        impl Transport for Down {
            async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ClientError> {
                Err(ClientError::Transport("connection refused".to_string()))
            }
        }

        let store = ClientStore::new(ApiClient::new(Down, Arc::new(MemoryTokenStorage::new())));
        store.fetch_roles().await;

        assert_eq!(
            store.error().as_deref(),
            Some("Transport error: connection refused")
        );
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_loading_is_true_while_in_flight() {
        let transport = FakeTransport::new(|_| (Duration::from_millis(50), ApiResponse { status: 200, body: json!([]) }));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));

        let observe = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.loading()
        };
        let (_, during) = tokio::join!(store.fetch_users(), observe);

        assert!(during);
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_cancelled_operation_clears_loading() {
        let transport = FakeTransport::new(|_| (Duration::from_secs(60), ApiResponse { status: 200, body: json!([]) }));
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));

        let result = tokio::time::timeout(Duration::from_millis(20), store.fetch_users()).await;

        assert!(result.is_err());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_concurrent_updates_last_completion_wins() {
        let transport = FakeTransport::new(|request| {
            let name = request.body.as_ref().and_then(|b| b["name"].as_str()).unwrap_or_default().to_string();
            let delay = if name == "Slow" { 60 } else { 10 };
            (
                Duration::from_millis(delay),
                ApiResponse { status: 200, body: json!({"data": {"name": name}}) },
            )
        });
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));
        seeded(&store, vec![user(7, "Gus")]);

        let slow = UpdateUserDto { name: Some("Slow".to_string()), ..Default::default() };
        let fast = UpdateUserDto { name: Some("Fast".to_string()), ..Default::default() };
        tokio::join!(store.update_user(7, &slow), store.update_user(7, &fast));

        assert_eq!(store.users()[0].name, "Slow");
    }

    #[tokio::test]
    async fn test_init_loads_users_and_roles() {
        let transport = FakeTransport::new(|request| match request.path.as_str() {
            "/usuarios" => reply(200, json!([{"id": 1, "name": "Ana", "email": "ana@example.com", "role_id": 1}])),
            "/roles" => reply(200, json!({"data": [{"id": 1, "name": "admin"}, {"id": 2, "name": "user"}]})),
            other => panic!("unexpected path {other}"),
        });
        let store = store_with(transport, Arc::new(MemoryTokenStorage::new()));

        store.init().await;

        let state = store.snapshot();
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.roles.len(), 2);
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_login_stores_token_and_logout_clears_session() {
        let transport = FakeTransport::new(|_| {
            reply(
                200,
                json!({
                    "access_token": "a.b.c",
                    "token_type": "Bearer",
                    "expires_in": 3600,
                    "user": {"id": 1, "name": "Ana", "email": "ana@example.com", "role_id": 1}
                }),
            )
        });
        let tokens = Arc::new(MemoryTokenStorage::new());
        let store = store_with(transport, tokens.clone());
        seeded(&store, vec![user(1, "Ana")]);

        assert!(store.login("ana@example.com", "pw").await);
        assert_eq!(tokens.load().as_deref(), Some("a.b.c"));

        store.logout();
        assert_eq!(tokens.load(), None);
        assert_eq!(store.snapshot(), StoreState::default());
    }
}
