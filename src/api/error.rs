use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::Error;

/// JSON error answer of the HTTP surface:
/// `{"status":"error","error":<code>,"message":<text>}`.
///
/// Remote response bodies are logged when the error is built and never
/// returned to the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(%detail, "internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Something went wrong. Please try again.",
        )
    }

    /// Like the [`From<Error>`] conversion, but a missing resource is
    /// reported with `status` and `code` instead of the generic 404.
    pub fn when_missing(err: Error, status: StatusCode, code: &'static str) -> Self {
        match err {
            Error::NotFound(message) => Self::new(status, code, message),
            other => other.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => Self::bad_request("validation_error", message),
            Error::NotFound(message) => Self::not_found("not_found", message),
            Error::RateLimited { retry_after } => Self {
                status: StatusCode::TOO_MANY_REQUESTS,
                code: "rate_limited",
                message: format!(
                    "Too many playlist generations. Try again in {retry_after} seconds."
                ),
                retry_after: Some(retry_after),
            },
            Error::Configuration(message) => {
                error!(%message, "service is not configured");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    "The service is not configured correctly.",
                )
            }
            Error::UpstreamAuth { status, body } => {
                error!(status, %body, "system account token exchange failed");
                upstream()
            }
            Error::Upstream { status, body } => {
                warn!(status, %body, "spotify api call failed");
                upstream()
            }
            Error::Oracle { status, body } => {
                warn!(status, %body, "logic api call failed");
                upstream()
            }
            Error::Http(e) => {
                warn!(error = %e, "outbound request failed");
                upstream()
            }
        }
    }
}

fn upstream() -> ApiError {
    ApiError::new(
        StatusCode::BAD_GATEWAY,
        "upstream_error",
        "A remote service failed. Please try again.",
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "status": "error",
            "error": self.code,
            "message": self.message,
        });

        let Some(retry_after) = self.retry_after else {
            return (self.status, Json(body)).into_response();
        };

        body["retry_after"] = json!(retry_after);
        let mut response = (self.status, Json(body)).into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        response
    }
}
