//! Web server module for handling inbound webhooks.
//!
//! This module provides the HTTP surface of the responder:
//! - `POST /` receives Business Messages webhooks
//! - `GET /health` for liveness checks
//! - Anything else answers 404

pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{bm_webhook, health, not_found, AppState, HealthResponse};
pub use signature::{is_signature_verification_enabled, sign_body, validate_request, SIGNATURE_HEADER};

/// Build the application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        // Any other method on `/` is an unknown route, not a 405
        .route("/", post(bm_webhook).fallback(not_found))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
