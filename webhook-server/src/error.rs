//! Errors that reach the HTTP caller.
//!
//! Delivery failures never appear here: behaviors absorb them and answer
//! with a fallback sentence instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Request-level failure of the webhook.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Missing 'name' field in request body")]
    MissingName,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Internal Server Error")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingName | WebhookError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            WebhookError::Internal(message) => ErrorResponse {
                error: "Internal Server Error".to_string(),
                message: Some(message),
            },
            other => ErrorResponse {
                error: other.to_string(),
                message: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
