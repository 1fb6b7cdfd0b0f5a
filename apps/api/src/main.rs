//! # Shopagg API Server
//!
//! ```text
//! config ──► Database (pool + migrations) ──► AppState ──► axum::serve
//!                                                              │
//!                                        Ctrl+C / SIGTERM ─────┘ graceful shutdown
//! ```

use anyhow::Context;
use shopagg_api::{build_router, ApiConfig, AppState};
use shopagg_db::{Database, DbConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to info if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Starting Shopagg API server...");

    let config = ApiConfig::load(None).context("Failed to load configuration")?;
    info!(
        addr = %config.socket_addr(),
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database_path)
            .max_connections(config.max_connections)
            .query_timeout(config.query_timeout()),
    )
    .await
    .context("Failed to open database")?;

    let app = build_router(AppState::new(db.clone()));

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("Failed to bind to {}", config.socket_addr()))?;
    info!("Listening on http://{}", config.socket_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
