//! `ValidatedJson<T>`: `Json<T>` plus `validator` rules.
//!
//! Undecodable bodies are rejected with 400, rule violations with 422. Both
//! use the usual `{"error": ...}` body.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use userdesk_core::AppError;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    // field_errors() is a HashMap; keep the message stable.
    messages.sort();
    messages.join(", ")
}

fn rejection_message(rejection: &JsonRejection) -> String {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return "Missing 'Content-Type: application/json' header".to_string();
    }

    let text = rejection.body_text();
    if let Some(rest) = text.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        return format!("{} is required", field);
    }
    if text.contains("invalid type") {
        return "Invalid field type in request".to_string();
    }
    "Invalid request body".to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow::anyhow!(rejection_message(&rejection))))?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow::anyhow!(format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}
