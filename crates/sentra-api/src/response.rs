//! Response envelope helpers.
//!
//! Every response carries `{success, message, data?}`; error bodies
//! (built in [`crate::error`]) carry `{success: false, message}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// 200 envelope with a default message.
pub fn success<T: Serialize>(data: T) -> Json<JsonValue> {
    success_with_message(data, "Success")
}

/// 200 envelope with an explicit message.
pub fn success_with_message<T: Serialize>(data: T, message: &str) -> Json<JsonValue> {
    Json(serde_json::json!({
        "success": true,
        "message": message,
        "data": data,
    }))
}

/// 201 envelope.
pub fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<JsonValue>) {
    (StatusCode::CREATED, success_with_message(data, message))
}
