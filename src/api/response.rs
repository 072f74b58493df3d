use axum::Json;
use serde::Serialize;
use serde_json::{Value, json};

use super::ApiError;

/// Successful JSON answer: the payload's fields next to `"status":"ok"`.
pub fn ok<T: Serialize>(payload: T) -> Result<Json<Value>, ApiError> {
    let value = serde_json::to_value(payload).map_err(ApiError::internal)?;
    let body = match value {
        Value::Object(mut fields) => {
            fields.insert("status".to_string(), json!("ok"));
            Value::Object(fields)
        }
        other => json!({ "status": "ok", "data": other }),
    };
    Ok(Json(body))
}
