//! # Kasir POS Server
//!
//! Binary entry point: load config, open the pool, serve until signalled.
//!
//! ## Startup
//! ```text
//! .env ──► ServerConfig::load ──► Database::new ──► build_router ──► serve
//!                                      │
//!                                      └── AUTO_MIGRATE=true? run migrations
//! ```

use tokio::net::TcpListener;
use tracing::{error, info};

use kasir_db::Database;
use kasir_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    kasir_server::init_tracing();

    info!("Starting Kasir POS server...");

    // Load configuration
    let config = ServerConfig::load()?;
    let addr = config.bind_addr()?;
    let db_config = config.db_config()?;
    info!(
        %addr,
        backend = ?db_config.backend,
        max_connections = config.db_max_connections,
        auto_migrate = config.auto_migrate,
        "Configuration loaded"
    );

    // Connect to database
    let db = Database::new(db_config).await?;
    if !db.health_check().await {
        error!("Database is not answering queries");
    }

    let app = build_router(AppState::new(db.clone()));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to install Ctrl+C handler");
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
                error!(?e, "Failed to install SIGTERM handler");
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
