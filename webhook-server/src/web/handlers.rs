//! Webhook endpoint handlers.
//!
//! The webhook handler:
//! 1. Normalizes the function name and arguments from the raw body
//! 2. Dispatches to the matching behavior
//! 3. Always answers `{ "result": ... }` unless `name` is missing
//!
//! Email failures are absorbed inside the dispatcher and never change the
//! status code.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header,
    Form, Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::call::{DispatchSettings, Dispatcher, FunctionCall};
use crate::error::WebhookError;
use crate::mail::Mailer;
use crate::Config;

/// Service name reported by the status endpoint.
pub const SERVICE_NAME: &str = "VideoPlus Webhook Server";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let dispatcher = Dispatcher::new(mailer, DispatchSettings::from(&config));
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            started_at: Instant::now(),
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Root status response.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Root status endpoint.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: now_rfc3339(),
    })
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since the server started
    pub uptime: f64,
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: now_rfc3339(),
    })
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Voice Agent Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub result: String,
}

/// Raw webhook body, decoded from JSON or from a url-encoded form.
///
/// Form pairs become string fields of one object. Rejections of either kind
/// turn into a 400 `{ error }`.
#[derive(Debug)]
pub struct WebhookBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for WebhookBody
where
    S: Send + Sync,
{
    type Rejection = WebhookError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| body_rejected(rejection.body_text()))?;

            let fields: Map<String, Value> = pairs
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(WebhookBody(Value::Object(fields)));
        }

        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| body_rejected(rejection.body_text()))?;
        Ok(WebhookBody(body))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn body_rejected(reason: String) -> WebhookError {
    warn!(error = %reason, "webhook_body_rejected");
    WebhookError::InvalidBody(reason)
}

/// Voice agent function-call webhook.
pub async fn function_webhook(
    State(state): State<AppState>,
    WebhookBody(body): WebhookBody,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let call = FunctionCall::from_body(&body);

    info!(
        function = call.name.as_deref().unwrap_or(""),
        arg_keys = ?call.args.keys().collect::<Vec<_>>(),
        "webhook_function_triggered"
    );
    let all_args = Value::Object(call.args.clone());
    debug!(args = %all_args, "webhook_function_args");

    let result = state
        .dispatcher
        .dispatch(call.name.as_deref(), &call.args)
        .await
        .inspect_err(|e| warn!(error = %e, "webhook_request_rejected"))?;

    Ok(Json(WebhookResponse { result }))
}
