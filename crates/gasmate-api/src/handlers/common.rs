//! Shared handler helpers.

use axum::http::{header, HeaderMap};
use axum::Json;
use serde_json::Value;

use crate::models::ErrorResponse;

pub type HandlerResult<T> = Result<Json<T>, ErrorResponse>;

/// Successful JSON response. Objects get `success: true` unless they set it.
pub fn ok(mut value: Value) -> HandlerResult<Value> {
    if let Value::Object(map) = &mut value {
        map.entry("success").or_insert(Value::Bool(true));
    }
    Ok(Json(value))
}

/// Bearer credential from the `Authorization` header.
pub fn bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok();
    gasmate_core::identity::bearer_token(value)
}
