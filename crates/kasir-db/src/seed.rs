//! # Default Catalog
//!
//! The starter products a fresh till is stocked with.

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use kasir_core::NewProduct;

/// `(name, price)` pairs inserted by [`seed_default_catalog`].
pub const DEFAULT_CATALOG: &[(&str, i64)] = &[
    ("Beras 5kg", 50_000),
    ("Minyak Goreng", 15_000),
    ("Gula 1kg", 12_000),
    ("Telur 1kg", 25_000),
];

/// Inserts [`DEFAULT_CATALOG`] when the catalog is empty.
///
/// ## Returns
/// Number of products inserted (0 if the catalog already had products).
pub async fn seed_default_catalog(db: &Database) -> DbResult<usize> {
    let repo = db.products();

    let existing = repo.count().await?;
    if existing > 0 {
        info!(existing, "Catalog not empty, skipping seed");
        return Ok(0);
    }

    for (name, price) in DEFAULT_CATALOG {
        let product = NewProduct {
            name: (*name).to_string(),
            price: *price,
        };
        repo.insert(&product).await?;
    }

    info!(count = DEFAULT_CATALOG.len(), "Seeded default catalog");
    Ok(DEFAULT_CATALOG.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    #[tokio::test]
    async fn test_seed_only_into_empty_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(seed_default_catalog(&db).await.unwrap(), 4);
        assert_eq!(seed_default_catalog(&db).await.unwrap(), 0);

        let products = db.products().list().await.unwrap();
        assert_eq!(products.len(), 4);
        assert_eq!(products[0].name, "Beras 5kg");
        assert_eq!(products[0].price, 50_000);
        assert_eq!(products[3].name, "Telur 1kg");
    }
}
