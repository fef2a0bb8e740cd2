//! API server
//!
//! Opens the sales backend, serves the chart API and shuts down cleanly on
//! SIGINT or SIGTERM.

use std::time::Duration;

use anyhow::{Context, Result};
use tally_api::{AppState, build_router};
use tally_config::Config;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::backend::OpenedBackend;

/// Run the server until a shutdown signal arrives
pub async fn run(config: Config) -> Result<()> {
    let backend = OpenedBackend::open(&config.database).await?;
    let shared = backend.shared();
    info!(backend = shared.name(), "sales backend initialized");

    let app = build_router(AppState::new(shared))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(addr = %addr, "API server listening");

    // Create cancellation token for coordinated shutdown
    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                server_cancel.cancelled().await;
            })
            .await
    });

    wait_for_shutdown().await;
    info!("shutdown signal received, stopping server...");
    cancel.cancel();

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => error!(error = %e, "API server error"),
        Ok(Err(e)) => warn!(error = %e, "server task panicked during shutdown"),
        Err(_) => warn!("server did not finish within timeout, continuing shutdown"),
    }

    backend.close().await;
    info!("Tally shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
///
/// If a handler cannot be installed, that signal is never awaited.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
