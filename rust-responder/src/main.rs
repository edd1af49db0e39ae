//! bizmsg-web - Business Messages webhook responder.
//!
//! Receives conversation events on `POST /`, verifies their signature and
//! answers through the Business Messages API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bizmsg::auth::ServiceAccountCredentials;
use bizmsg::reply::TokioClock;
use bizmsg::web::{app_router, AppState};
use bizmsg::{BusinessMessagesClient, Config, Executor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        partner_key_configured = config.partner_key.is_some(),
        credentials_path = %config.credentials_path.display(),
        api_base_url = %config.api_base_url,
        handoff_delay_ms = config.handoff_delay_ms,
        "config_loaded"
    );

    // Token exchange and API calls share one HTTP client
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("Failed to create HTTP client")?;
    let credentials = Arc::new(ServiceAccountCredentials::new(
        http.clone(),
        config.credentials_path.clone(),
    ));

    let client = BusinessMessagesClient::new(http, &config.api_base_url, credentials)
        .context("Failed to create Business Messages client")?;

    let executor = Executor::new(Arc::new(client), Arc::new(TokioClock), config.handoff_delay());
    let state = AppState::new(config.clone(), executor);

    let app = app_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
