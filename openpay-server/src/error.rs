//! Mapping from library errors to HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openpay_lib::OpenpayError;
use serde_json::json;

/// Error returned by every handler: a status plus `{success:false, error}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<OpenpayError> for ApiError {
    fn from(err: OpenpayError) -> Self {
        let status = match &err {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            OpenpayError::Validation(_) => StatusCode::BAD_REQUEST,
            OpenpayError::AlreadyExists(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(code = err.code() as i32, error = %err, "request failed");
        } else {
            tracing::debug!(code = err.code() as i32, error = %err, "request rejected");
        }
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (OpenpayError::AliasNotFound("a".into()), StatusCode::NOT_FOUND),
            (OpenpayError::validation("bad"), StatusCode::BAD_REQUEST),
            (OpenpayError::AlreadyExists("a".into()), StatusCode::CONFLICT),
            (
                OpenpayError::fetch_failed("https://example.test", "HTTP 503"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (OpenpayError::storage("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }
}
