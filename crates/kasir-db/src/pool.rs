//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite and PostgreSQL.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Server Startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_url(url) ← Normalize URL, detect backend               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool (+ migrations if enabled)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            AnyPool                       │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Cloned into axum State, one handle per request                 │
//! │       ▼                                                                 │
//! │  GET /api/products   ──► uses Conn1                                    │
//! │  POST /api/checkout  ──► uses Conn2 (transaction)                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## URL Normalization
//! `postgres://` is rewritten to `postgresql://`. SQLite file URLs get
//! `mode=rwc` so the database file is created on first use.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;

/// Connection string used when neither `DATABASE_URL` nor `DATABASE` is set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://kasir.db";

// =============================================================================
// Backend
// =============================================================================

/// The database engine behind a connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    /// Detects the backend from a (normalized) connection string.
    pub fn from_url(url: &str) -> DbResult<Self> {
        if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else if url.starts_with("postgresql:") || url.starts_with("postgres:") {
            Ok(Backend::Postgres)
        } else {
            let scheme = url.split(':').next().unwrap_or(url);
            Err(DbError::UnsupportedBackend(scheme.to_string()))
        }
    }
}

/// Rewrites the legacy `postgres://` scheme to `postgresql://`.
///
/// ```rust
/// use kasir_db::normalize_database_url;
///
/// assert_eq!(
///     normalize_database_url("postgres://kasir@localhost/kasir"),
///     "postgresql://kasir@localhost/kasir"
/// );
/// assert_eq!(normalize_database_url("sqlite://kasir.db"), "sqlite://kasir.db");
/// ```
pub fn normalize_database_url(url: &str) -> String {
    let url = url.trim();
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{}", rest),
        None => url.to_string(),
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::from_url("postgres://kasir@localhost/kasir")?
///     .max_connections(10)
///     .run_migrations(true);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Normalized connection string.
    pub database_url: String,

    /// Engine detected from the URL.
    pub backend: Backend,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 0
    pub min_connections: u32,

    /// How long a request waits for a free connection.
    /// Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Maximum lifetime of a connection.
    /// Default: 30 minutes
    pub max_lifetime: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: false (deployments run the `migrate` binary)
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration from a connection string.
    ///
    /// ## Errors
    /// `DbError::UnsupportedBackend` for anything other than SQLite or
    /// PostgreSQL.
    pub fn from_url(url: &str) -> DbResult<Self> {
        let database_url = normalize_database_url(url);
        let backend = Backend::from_url(&database_url)?;

        Ok(DbConfig {
            database_url,
            backend,
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            run_migrations: false,
        })
    }

    /// Reads `DATABASE_URL`, then `DATABASE`, falling back to
    /// [`DEFAULT_DATABASE_URL`].
    pub fn from_env() -> DbResult<Self> {
        let url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE"))
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::from_url(&url)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory SQLite configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Migrated, isolated, gone when dropped
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_url: "sqlite::memory:".to_string(),
            backend: Backend::Sqlite,
            // Every connection would get its own empty database
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            run_migrations: true,
        }
    }

    /// The URL handed to the driver.
    fn connect_url(&self) -> String {
        let url = &self.database_url;
        if self.backend == Backend::Sqlite && !url.contains(":memory:") && !url.contains("mode=") {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{}{}mode=rwc", url, separator)
        } else {
            url.clone()
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: clones share the same pool.
///
/// ## Usage in axum Handlers
/// ```rust,ignore
/// async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
///     Ok(Json(state.db.products().list().await?))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    backend: Backend,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Registers the SQLite and PostgreSQL drivers with `Any`
    /// 2. Creates the connection pool (SQLite files are created if missing)
    /// 3. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(backend = ?config.backend, "Initializing database connection");

        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.connect_url())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            backend: config.backend,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        } else {
            debug!("Skipping migrations at connect");
        }

        Ok(db)
    }

    /// Runs the migration set of this database's engine.
    ///
    /// Idempotent: applied migrations are tracked in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!(backend = ?self.backend, "Running database migrations");
        migrations::run_migrations(&self.pool, self.backend).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// The engine this handle is connected to.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(db.backend(), Backend::Sqlite);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[test]
    fn test_backend_detection() {
        assert_eq!(Backend::from_url("sqlite://kasir.db").unwrap(), Backend::Sqlite);
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert_eq!(
            Backend::from_url("postgresql://localhost/kasir").unwrap(),
            Backend::Postgres
        );
        assert!(matches!(
            Backend::from_url("mysql://localhost/kasir"),
            Err(DbError::UnsupportedBackend(scheme)) if scheme == "mysql"
        ));
    }

    #[test]
    fn test_from_url_normalizes_postgres_scheme() {
        let config = DbConfig::from_url("postgres://u:p@db:5432/kasir").unwrap();

        assert_eq!(config.database_url, "postgresql://u:p@db:5432/kasir");
        assert_eq!(config.backend, Backend::Postgres);
        assert_eq!(config.connect_url(), "postgresql://u:p@db:5432/kasir");
    }

    #[test]
    fn test_sqlite_file_urls_create_missing_files() {
        let config = DbConfig::from_url("sqlite://kasir.db").unwrap();
        assert_eq!(config.connect_url(), "sqlite://kasir.db?mode=rwc");

        let config = DbConfig::from_url("sqlite://kasir.db?mode=ro").unwrap();
        assert_eq!(config.connect_url(), "sqlite://kasir.db?mode=ro");

        assert_eq!(DbConfig::in_memory().connect_url(), "sqlite::memory:");
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::from_url("sqlite://kasir.db")
            .unwrap()
            .max_connections(10)
            .min_connections(2)
            .run_migrations(true);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(config.run_migrations);
    }
}
