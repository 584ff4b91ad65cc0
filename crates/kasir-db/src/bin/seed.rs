//! # Seed the Default Catalog
//!
//! Stocks an empty catalog with the starter products. Does nothing if the
//! catalog already has products.
//!
//! ## Usage
//! ```bash
//! # Uses DATABASE_URL / DATABASE, else sqlite://kasir.db
//! cargo run -p kasir-db --bin seed
//!
//! # Explicit database
//! cargo run -p kasir-db --bin seed -- --database-url postgres://kasir@localhost/kasir
//! ```

use clap::Parser;
use kasir_db::{seed_default_catalog, Database, DbConfig};

#[derive(Parser)]
#[command(name = "seed")]
#[command(author, version, about = "Seed the Kasir POS default catalog")]
struct Args {
    /// Database connection string (falls back to DATABASE_URL, then DATABASE)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Apply pending migrations before seeding
    #[arg(long)]
    migrate: bool,
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
    .run_migrations(args.migrate);

    println!("🌱 Kasir POS Seed");
    println!("=================");

    let db = Database::new(config).await?;
    let inserted = seed_default_catalog(&db).await?;

    if inserted == 0 {
        println!("⚠ Catalog already has products, nothing to do");
    } else {
        println!("✓ Inserted {} products", inserted);
    }

    db.close().await;
    Ok(())
}
