//! # Apply Database Migrations
//!
//! Runs the embedded migration set for the configured engine, then exits.
//! Deployments run this before starting the server.
//!
//! ## Usage
//! ```bash
//! cargo run -p kasir-db --bin migrate
//! cargo run -p kasir-db --bin migrate -- --database-url sqlite://data/kasir.db
//! ```

use clap::Parser;
use kasir_db::migrations::migration_status;
use kasir_db::{Database, DbConfig};

#[derive(Parser)]
#[command(name = "migrate")]
#[command(author, version, about = "Apply Kasir POS database migrations")]
struct Args {
    /// Database connection string (falls back to DATABASE_URL, then DATABASE)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Only report how many migrations are applied
    #[arg(long)]
    status: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    kasir_db::init_cli_tracing();

    let args = Args::parse();
    let config = match args.database_url {
        Some(url) => DbConfig::from_url(&url)?,
        None => DbConfig::from_env()?,
    }
    .max_connections(1)
    .run_migrations(false);

    let db = Database::new(config).await?;

    if !args.status {
        db.run_migrations().await?;
    }

    let (total, applied) = migration_status(db.pool(), db.backend()).await?;
    println!("✓ {:?}: {}/{} migrations applied", db.backend(), applied, total);

    db.close().await;
    Ok(())
}
