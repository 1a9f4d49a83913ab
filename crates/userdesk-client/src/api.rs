//! Typed calls against the Userdesk API.
//!
//! Every call passes through [`ApiClient::bearer`], which attaches the stored
//! token only while it is locally unexpired and drops it from storage
//! otherwise.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use userdesk_auth::is_token_expired;
use userdesk_models::{LoginRequest, LoginResponse};

use crate::error::ClientError;
use crate::token::TokenStorage;
use crate::transport::{ApiRequest, Transport};

pub const USERS_PATH: &str = "/usuarios";
pub const ROLES_PATH: &str = "/roles";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";

pub struct ApiClient<T> {
    transport: T,
    tokens: Arc<dyn TokenStorage>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, tokens: Arc<dyn TokenStorage>) -> Self {
        Self { transport, tokens }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStorage> {
        &self.tokens
    }

    /// The token to present, if one is stored and not yet expired. An
    /// expired or unreadable token is removed from storage.
    pub fn bearer(&self) -> Option<String> {
        let token = self.tokens.load()?;
        if is_token_expired(Some(&token)) {
            tracing::info!("Stored token expired, discarding it");
            self.tokens.remove();
            return None;
        }
        Some(token)
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer: self.bearer(),
        };
        tracing::debug!(method = %request.method, path = %request.path, authorized = request.bearer.is_some(), "Sending request");

        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response.body);
        }

        let err = ClientError::from_response(response.status, &response.body);
        if err.is_unauthenticated() {
            self.tokens.remove();
        }
        Err(err)
    }

    pub async fn list_users(&self) -> Result<Value, ClientError> {
        self.request(Method::GET, USERS_PATH, None).await
    }

    pub async fn list_roles(&self) -> Result<Value, ClientError> {
        self.request(Method::GET, ROLES_PATH, None).await
    }

    pub async fn register<P: Serialize>(&self, payload: &P) -> Result<Value, ClientError> {
        self.request(Method::POST, REGISTER_PATH, Some(to_body(payload)?))
            .await
    }

    pub async fn update_user(&self, id: i64, payload: Value) -> Result<Value, ClientError> {
        self.request(Method::PUT, &format!("{}/{}", USERS_PATH, id), Some(payload))
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<Value, ClientError> {
        self.request(Method::DELETE, &format!("{}/{}", USERS_PATH, id), None)
            .await
    }

    /// Exchanges credentials for a token and stores it.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = self
            .request(Method::POST, LOGIN_PATH, Some(to_body(&payload)?))
            .await?;

        let login: LoginResponse = serde_json::from_value(body)
            .map_err(|e| ClientError::Transport(format!("unexpected login response: {}", e)))?;
        self.tokens.save(&login.access_token)?;

        Ok(login)
    }
}

pub(crate) fn to_body<P: Serialize>(payload: &P) -> Result<Value, ClientError> {
    serde_json::to_value(payload)
        .map_err(|e| ClientError::Validation(format!("cannot encode payload: {}", e)))
}
