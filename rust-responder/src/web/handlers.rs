//! Webhook endpoint handlers.
//!
//! The webhook handler:
//! 1. Verifies the request signature
//! 2. Parses the inbound event
//! 3. Plans and sends the reply, waiting for every outbound call
//! 4. Answers with a plain-text summary
//!
//! Outbound failures never fail the webhook; they are logged and reported
//! in the response body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::event::InboundEvent;
use crate::reply::Executor;
use crate::web::signature::{validate_request, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub executor: Executor,
}

impl AppState {
    pub fn new(config: Config, executor: Executor) -> Self {
        Self {
            config: Arc::new(config),
            executor,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Body of the 404 response.
#[derive(Serialize)]
pub struct NotFoundResponse {
    pub message: &'static str,
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            message: "Route not found",
        }),
    )
}

// =============================================================================
// Business Messages Webhook
// =============================================================================

fn plain_text(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

/// Business Messages webhook endpoint.
///
/// The raw body is taken as bytes because the signature covers the exact
/// bytes sent.
pub async fn bm_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !validate_request(&body, signature, state.config.partner_key.as_deref()) {
        warn!(
            has_signature = !signature.is_empty(),
            body_length = body.len(),
            "bm_webhook_unauthorized"
        );
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let event: InboundEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "bm_webhook_malformed");
            return plain_text(StatusCode::BAD_REQUEST, format!("malformed payload: {}", e));
        }
    };

    if event.conversation_id.trim().is_empty() {
        warn!("bm_webhook_missing_conversation_id");
        return plain_text(
            StatusCode::BAD_REQUEST,
            "malformed payload: missing conversationId".to_string(),
        );
    }

    info!(
        conversation_id = %event.conversation_id,
        has_message = event.message.is_some(),
        has_suggestion_response = event.suggestion_response.is_some(),
        has_user_status = event.user_status.is_some(),
        "bm_webhook_received"
    );

    let report = state.executor.handle(&event).await;

    info!(
        conversation_id = %event.conversation_id,
        chains = report.chains.len(),
        failures = report.failures(),
        "bm_webhook_handled"
    );

    plain_text(StatusCode::OK, report.to_string())
}
