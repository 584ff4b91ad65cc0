//! # Kasir POS Server
//!
//! HTTP server for the cashier backend: a JSON API for the catalog,
//! checkout and sales report, plus a small server-rendered index page.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Routes                                       │
//! │                                                                         │
//! │  ┌────────────────────────┐  ┌────────────────────────────────────────┐│
//! │  │  JSON API              │  │  HTML surface                          ││
//! │  │                        │  │                                        ││
//! │  │ • GET/POST /api/products│ │ • GET  /                (index)        ││
//! │  │ • PUT/DELETE           │  │ • POST /tambah_produk   (form)         ││
//! │  │     /api/products/{id} │  │ • POST /tambah_transaksi (form)        ││
//! │  │ • POST /api/checkout   │  │ • GET  /api/produk                     ││
//! │  │ • GET  /api/sales      │  │                                        ││
//! │  └────────────────────────┘  └────────────────────────────────────────┘│
//! │                                                                         │
//! │  • GET /health                                                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState { db: Database }  (cloned into every handler)          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `DATABASE_URL` / `DATABASE` - connection string (default `sqlite://kasir.db`)
//! - `HOST` / `PORT` - bind address (default `0.0.0.0:5000`)
//! - `DB_MAX_CONNECTIONS` - pool size (default 5)
//! - `AUTO_MIGRATE` - run migrations at startup (default false)
//! - `RUST_LOG` - tracing filter

pub mod config;
pub mod error;
pub mod routes;

use kasir_db::Database;
use tracing_subscriber::EnvFilter;

// Re-exports
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorCode};
pub use routes::build_router;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    /// Creates the state handed to the router.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins; otherwise [`config::DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
