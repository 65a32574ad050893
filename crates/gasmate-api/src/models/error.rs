//! API error responses.
//!
//! Every failure leaves the server as `{ "success": false, "code", "message" }`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gasmate_core::Error as CoreError;
use serde::Serialize;

pub type ApiResult<T> = Result<T, ErrorResponse>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    code: &'a str,
    message: &'a str,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// Mapping used by the notification endpoints.
    ///
    /// Identity and missing-settings failures are reported as 500 there, which
    /// is what dashboard clients of those routes expect.
    pub fn for_notification(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized(_) | CoreError::ConfigurationMissing(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.code(),
                err.to_string(),
            ),
            other => Self::from(other),
        }
    }
}

impl From<CoreError> for ErrorResponse {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CoreError::ConfigurationMissing(_) => StatusCode::PRECONDITION_FAILED,
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::AlreadyFinalized(_) | CoreError::FanoutInProgress(_) => StatusCode::CONFLICT,
            CoreError::ChannelDelivery { .. }
            | CoreError::Storage(_)
            | CoreError::Serialization(_)
            | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(code = err.code(), error = %err, "Request failed");
        }
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_BODY", rejection.body_text())
    }
}

impl From<QueryRejection> for ErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_QUERY", rejection.body_text())
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            code: &self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
