//! Client-side error taxonomy.

use serde_json::Value;
use thiserror::Error;

/// Why a request made by the client failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Missing, malformed or expired credential (HTTP 401).
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid identity without the required role (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The target id does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The payload was rejected (HTTP 400, 409, 422).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure, server fault or an unreadable response.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// Classifies a non-success response, preferring the server's own
    /// `error` (or `message`) text.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed with status {}", status));

        match status {
            401 => Self::Unauthenticated(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            400 | 409 | 422 => Self::Validation(message),
            _ => Self::Transport(message),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_maps_status() {
        let body = json!({"error": "boom"});
        assert_eq!(
            ClientError::from_response(401, &body),
            ClientError::Unauthenticated("boom".to_string())
        );
        assert_eq!(
            ClientError::from_response(403, &body),
            ClientError::Forbidden("boom".to_string())
        );
        assert_eq!(
            ClientError::from_response(404, &body),
            ClientError::NotFound("boom".to_string())
        );
        assert_eq!(
            ClientError::from_response(422, &body),
            ClientError::Validation("boom".to_string())
        );
        assert_eq!(
            ClientError::from_response(503, &body),
            ClientError::Transport("boom".to_string())
        );
    }

    #[test]
    fn test_from_response_without_message() {
        let err = ClientError::from_response(500, &Value::Null);
        assert_eq!(err.to_string(), "Transport error: request failed with status 500");
    }

    #[test]
    fn test_display_mentions_not_found() {
        let err = ClientError::from_response(404, &json!({"error": "User with id 3 not found"}));
        assert!(err.to_string().to_lowercase().contains("not found"));
    }
}
