#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use userdesk::router::init_router;
use userdesk::state::AppState;
use userdesk_auth::create_access_token;
use userdesk_client::{ApiRequest, ApiResponse, ClientError, Transport};
use userdesk_config::{CorsConfig, JwtConfig};
use userdesk_core::hash_password;
use userdesk_db::{NewUser, UserRepository};
use userdesk_models::{User, system_roles};

pub const PASSWORD: &str = "testpass123";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

/// A router over a fresh in-memory store. Clones of the router share the store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(jwt_config(), CorsConfig::default());
        Self {
            router: init_router(state.clone()),
            state,
        }
    }

    pub async fn create_user(&self, name: &str, email: &str, role_id: i64) -> User {
        self.state
            .users
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
                role_id,
            })
            .await
            .unwrap()
    }

    pub async fn admin_token(&self) -> String {
        let admin = self
            .create_user("Admin", "admin@example.com", system_roles::ADMIN)
            .await;
        self.token_for(&admin, system_roles::slugs::ADMIN)
    }

    pub async fn user_token(&self) -> String {
        let user = self
            .create_user("Regular", "user@example.com", system_roles::USER)
            .await;
        self.token_for(&user, system_roles::slugs::USER)
    }

    pub fn token_for(&self, user: &User, role: &str) -> String {
        create_access_token(user.id, &user.email, role, &self.state.jwt_config).unwrap()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

/// Client transport that dispatches straight into the router.
#[derive(Clone)]
pub struct RouterTransport {
    router: Router,
}

impl RouterTransport {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

impl Transport for RouterTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut builder = Request::builder()
            .method(request.method)
            .uri(request.path);
        if let Some(token) = request.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match request.body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let http_request = builder
            .body(body)
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .to_bytes();

        Ok(ApiResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        })
    }
}
