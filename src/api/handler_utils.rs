use axum::body::Bytes;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::api::error::ErrorKind;
use crate::db::content::ContentRepoError;
use crate::gateway::GatewayError;

pub type ApiObject<T> = (StatusCode, Json<T>);

#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    error_kind: ErrorKind,
    error_code: String,
}

pub fn error_response(
    status: StatusCode,
    kind: ErrorKind,
    code: impl Into<String>,
    message: impl Into<String>,
) -> ApiObject<Value> {
    (
        status,
        into_json(ErrorResponse {
            success: false,
            error: message.into(),
            error_kind: kind,
            error_code: code.into(),
        }),
    )
}

pub fn validation_error(message: impl Into<String>) -> ApiObject<Value> {
    error_response(
        StatusCode::BAD_REQUEST,
        ErrorKind::Validation,
        "validation_error",
        message,
    )
}

pub fn map_repo_error(error: ContentRepoError) -> ApiObject<Value> {
    match error {
        ContentRepoError::Validation(message) => validation_error(message),
        ContentRepoError::Internal(message) => storage_error(message),
        ContentRepoError::Sqlite(source) => storage_error(format!("database error: {source}")),
    }
}

pub fn map_gateway_error(error: GatewayError) -> ApiObject<Value> {
    match error {
        GatewayError::Unavailable => error_response(
            StatusCode::BAD_REQUEST,
            ErrorKind::Provider,
            "gateway_unavailable",
            error.to_string(),
        ),
        GatewayError::UnsupportedInput => error_response(
            StatusCode::BAD_REQUEST,
            ErrorKind::Validation,
            "unsupported_input",
            error.to_string(),
        ),
        GatewayError::Upstream(message) => {
            warn!(detail = %message, "generative service call failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Provider,
                "upstream_error",
                message,
            )
        }
    }
}

fn storage_error(message: String) -> ApiObject<Value> {
    error!(detail = %message, "storage operation failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Infra,
        "storage_error",
        message,
    )
}

pub fn internal_error(message: impl Into<String>) -> ApiObject<Value> {
    let detail = message.into();
    error!(detail = %detail, "internal api error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Infra,
        "internal_error",
        detail,
    )
}

pub fn success(payload: impl Serialize) -> ApiObject<Value> {
    (StatusCode::OK, into_json(payload))
}

pub fn into_json(payload: impl Serialize) -> Json<Value> {
    match serde_json::to_value(payload) {
        Ok(value) => Json(value),
        Err(error) => Json(json!({
            "success": false,
            "error": format!("response serialization failed: {error}"),
            "error_kind": ErrorKind::Infra.as_str(),
            "error_code": "internal_error",
        })),
    }
}

/// Decodes a JSON request body. An empty body or a literal `null` yields
/// `Ok(None)` so handlers can answer with their own "no data" message.
pub fn decode_json_body<T>(body: &Bytes) -> Result<Option<T>, ApiObject<Value>>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body.as_ref())
        .map_err(|e| validation_error(format!("Invalid JSON body: {e}")))?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| validation_error(format!("Invalid JSON body: {e}")))
}
