//! Web server module.
//!
//! Routes:
//! - `POST /retell-webhook` receives function calls from the voice agent
//! - `GET /` and `GET /health` report liveness
//!
//! A panicking handler is turned into a 500 response so the server keeps
//! serving later requests.

pub mod handlers;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::error::WebhookError;

pub use handlers::{
    function_webhook, health, status, AppState, HealthResponse, StatusResponse, WebhookBody,
    WebhookResponse,
};

/// Path the voice platform posts function calls to.
pub const WEBHOOK_PATH: &str = "/retell-webhook";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let body_limit = state.config.body_limit_bytes;

    Router::new()
        .route("/", get(status))
        .route("/health", get(health))
        .route(WEBHOOK_PATH, post(function_webhook))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    error!(panic = %message, "webhook_handler_panicked");

    WebhookError::Internal(message).into_response()
}
