//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - List the catalog (id ascending, no pagination)
//! - Create / update with name uniqueness
//! - Delete without touching sales history
//!
//! ## Name Uniqueness
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert("Gula 1kg")                                                     │
//! │       │                                                                 │
//! │       ├── get_by_name → Some(_)   → DbError::UniqueViolation            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ... RETURNING id                                                │
//! │       │                                                                 │
//! │       └── UNIQUE(products.name) fails (concurrent insert)                │
//! │                                    → DbError::UniqueViolation           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::AnyPool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{NewProduct, Product, ProductUpdate};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.insert(&NewProduct::new("Gula 1kg", 12_000)?).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: AnyPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: AnyPool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its exact name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price
            FROM products
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the name is taken.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, price = product.price, "Inserting product");

        if self.get_by_name(&product.name).await?.is_some() {
            return Err(DbError::duplicate("name", &product.name));
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_conflict(e, &product.name))?;

        Ok(Product {
            id,
            name: product.name.clone(),
            price: product.price,
        })
    }

    /// Applies a partial update.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if no product has this id
    /// - `DbError::UniqueViolation` if the new name belongs to another product
    pub async fn update(&self, id: i64, update: &ProductUpdate) -> DbResult<Product> {
        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if update.is_empty() {
            return Ok(product);
        }

        if let Some(ref name) = update.name {
            if let Some(existing) = self.get_by_name(name).await? {
                if existing.id != id {
                    return Err(DbError::duplicate("name", name));
                }
            }
        }

        update.apply_to(&mut product);
        debug!(id, name = %product.name, price = product.price, "Updating product");

        sqlx::query(
            r#"
            UPDATE products
            SET name = $1, price = $2
            WHERE id = $3
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| name_conflict(e, &product.name))?;

        Ok(product)
    }

    /// Deletes a product. Recorded sales keep their snapshots.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no product has this id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id, "Deleted product");
        Ok(())
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Attaches the offending name to a unique violation.
fn name_conflict(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("name", name),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
