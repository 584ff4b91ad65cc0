//! # Database Migrations
//!
//! Embedded SQL migrations for Kasir POS, one set per engine.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  `migrate` binary (or AUTO_MIGRATE=true at server startup)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Backend::Sqlite ──► migrations/sqlite/                                │
//! │  Backend::Postgres ► migrations/postgres/                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs _sqlx_migrations                       │
//! │       │                                                                 │
//! │       └── 001_initial_schema.sql  ⬜ (pending → run in a transaction)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Record checksum in _sqlx_migrations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Add `NNN_description.sql` to BOTH `migrations/sqlite/` and
//!    `migrations/postgres/`, with the same sequence number
//! 2. **NEVER** modify existing migrations - always add new ones

use sqlx::migrate::Migrator;
use sqlx::AnyPool;
use tracing::info;

use crate::error::DbResult;
use crate::pool::Backend;

/// Embedded migrations for SQLite.
static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Embedded migrations for PostgreSQL.
static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("../../migrations/postgres");

fn migrator(backend: Backend) -> &'static Migrator {
    match backend {
        Backend::Sqlite => &SQLITE_MIGRATOR,
        Backend::Postgres => &POSTGRES_MIGRATOR,
    }
}

/// Runs all pending database migrations for `backend`.
pub async fn run_migrations(pool: &AnyPool, backend: Backend) -> DbResult<()> {
    info!("Checking for pending migrations");

    migrator(backend).run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for diagnostics.
pub async fn migration_status(pool: &AnyPool, backend: Backend) -> DbResult<(usize, usize)> {
    let total = migrator(backend).migrations.len();

    // The table doesn't exist until the first run
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.run_migrations().await.unwrap();

        let (total, applied) = migration_status(db.pool(), Backend::Sqlite).await.unwrap();
        assert!(total > 0);
        assert_eq!(total, applied);
    }

    #[test]
    fn test_both_engines_have_the_same_migrations() {
        let sqlite: Vec<i64> = SQLITE_MIGRATOR.iter().map(|m| m.version).collect();
        let postgres: Vec<i64> = POSTGRES_MIGRATOR.iter().map(|m| m.version).collect();
        assert_eq!(sqlite, postgres);
    }
}
