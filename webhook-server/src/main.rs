//! VideoPlus Webhook Server.
//!
//! Receives function calls from the voice agent, sends the matching emails
//! and answers with a short sentence for the agent to speak.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use videoplus::{router, AppState, Config, Mailer, SmtpMailer, UnconfiguredMailer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    install_panic_hook();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        admin_email = %config.admin_email,
        smtp_host = %config.smtp_host,
        smtp_port = config.smtp_port,
        smtp_configured = config.smtp_configured(),
        from = %config.from_address,
        "config_loaded"
    );

    let mailer = build_mailer(&config);
    let port = config.port;
    let app = router(AppState::new(config, mailer));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Pick the SMTP mailer, or one that always fails when SMTP is unusable.
fn build_mailer(config: &Config) -> Arc<dyn Mailer> {
    match SmtpMailer::from_config(config) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            warn!(error = %e, "smtp_unavailable_emails_disabled");
            Arc::new(UnconfiguredMailer)
        }
    }
}

/// Route panics through tracing so they land in the JSON log stream.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        error!(panic = %info, location = %location, "panic");
    }));
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
