//! Shape handling for response bodies.
//!
//! Endpoints answer with a bare entity, a bare array, or an envelope whose
//! `data` field holds either. Everything the store reads goes through
//! [`resolve_data`] first.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Extracts the usable collection or item from a response body.
///
/// `B` if it is an array; else `B.data` if present and not null (array or
/// single item); else `B` if not null; else an empty array.
pub fn resolve_data(body: Value) -> Value {
    match body {
        Value::Null => Value::Array(Vec::new()),
        Value::Object(mut map) if map.get("data").is_some_and(|data| !data.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// The single entity carried by a creation response, if any.
pub fn single_item(body: Value) -> Option<Value> {
    match resolve_data(body) {
        Value::Array(items) => items.into_iter().next(),
        Value::Null => None,
        item => Some(item),
    }
}

/// Decodes a list response into typed items. A single object counts as a
/// one-element list.
pub fn decode_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ClientError> {
    let resolved = match resolve_data(body) {
        Value::Array(items) => Value::Array(items),
        item => Value::Array(vec![item]),
    };

    serde_json::from_value(resolved)
        .map_err(|e| ClientError::Transport(format!("unexpected response shape: {}", e)))
}

/// Picks the fields to merge after an update: the server's entity when it
/// sent one, otherwise the submitted payload.
pub fn update_source(body: Value, submitted: &Value) -> Map<String, Value> {
    let from_server = match resolve_data(body) {
        Value::Object(map) => Some(map),
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    };

    match from_server {
        Some(map) if !map.is_empty() => map,
        _ => submitted.as_object().cloned().unwrap_or_default(),
    }
}

/// Overlays `fields` onto `local`, then forces `id` back to `id`.
pub fn merge_fields(local: &mut Value, fields: Map<String, Value>, id: i64) {
    if let Value::Object(target) = local {
        for (key, value) in fields {
            target.insert(key, value);
        }
        target.insert("id".to_string(), Value::from(id));
    }
}
