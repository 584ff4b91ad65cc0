//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record(&Checkout)                                 │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO sales (created_at, total, paid, change)              │
//! │   │        RETURNING id ──────────────────────────┐                    │
//! │   ├── INSERT INTO sale_items (sale_id, ...)  ◄────┤  one per item      │
//! │   ├── INSERT INTO sale_items (sale_id, ...)  ◄────┘                    │
//! │   │                                                                     │
//! │   ├── any error? → drop tx → ROLLBACK (zero rows in both tables)       │
//! │   ▼                                                                     │
//! │  COMMIT → sale id                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timestamps
//! `created_at` is stored as microseconds since the Unix epoch (UTC), so
//! range filters and ordering are plain integer comparisons on both engines.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::AnyPool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use kasir_core::{Checkout, Product, Sale, SaleItem, SaleReport, SalesFilter};

// =============================================================================
// Row Types
// =============================================================================

/// `sales` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    created_at: i64,
    total: i64,
    paid: Option<i64>,
    change: Option<i64>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = DbError;

    fn try_from(row: SaleRow) -> DbResult<Self> {
        let created_at = DateTime::from_timestamp_micros(row.created_at).ok_or_else(|| {
            DbError::Internal(format!(
                "sale {} has out-of-range created_at {}",
                row.id, row.created_at
            ))
        })?;

        Ok(Sale {
            id: row.id,
            created_at,
            total: row.total,
            paid: row.paid,
            change: row.change,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: AnyPool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: AnyPool) -> Self {
        SaleRepository { pool }
    }

    /// Records a checkout stamped with the current time.
    ///
    /// ## Returns
    /// The new sale id.
    pub async fn record(&self, checkout: &Checkout) -> DbResult<i64> {
        self.record_at(checkout, Utc::now()).await
    }

    /// Records a checkout with an explicit `created_at`.
    ///
    /// The sale header and every line item are written in one transaction.
    /// If any insert fails the transaction is dropped and rolled back.
    pub async fn record_at(&self, checkout: &Checkout, created_at: DateTime<Utc>) -> DbResult<i64> {
        if !checkout.total_matches_items() {
            warn!(
                total = checkout.total,
                items_total = checkout.items_total().minor(),
                "Checkout total does not match line items, recording client total"
            );
        }

        let change = checkout.change();
        let mut tx = self.pool.begin().await?;

        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (created_at, total, paid, change)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(created_at.timestamp_micros())
        .bind(checkout.total)
        .bind(checkout.paid)
        .bind(change)
        .fetch_one(&mut *tx)
        .await?;

        for item in &checkout.items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, name, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(sale_id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id,
            items = checkout.items.len(),
            total = checkout.total,
            ?change,
            "Sale recorded"
        );
        Ok(sale_id)
    }

    /// Records a single-line sale for a catalog product, snapshotting its
    /// current name and price. No paid amount.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the product doesn't exist.
    pub async fn record_from_catalog(&self, product_id: i64, quantity: i64) -> DbResult<i64> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", product_id))?;

        self.record(&Checkout::for_product(&product, quantity)).await
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, created_at, total, paid, change
            FROM sales
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Sale::try_from).transpose()
    }

    /// Gets the line items of a sale, in insertion order.
    pub async fn items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name, price, quantity
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Sales report: newest first, inclusive bounds, at most `filter.limit`
    /// sales, each with its items.
    pub async fn report(&self, filter: &SalesFilter) -> DbResult<Vec<SaleReport>> {
        let from = filter.from.map_or(i64::MIN, |t| t.timestamp_micros());
        let to = filter.to.map_or(i64::MAX, |t| t.timestamp_micros());

        debug!(from = ?filter.from, to = ?filter.to, limit = filter.limit, "Building sales report");

        let sales = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, created_at, total, paid, change
            FROM sales
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Sale::try_from)
        .collect::<DbResult<Vec<_>>>()?;

        if sales.is_empty() {
            return Ok(Vec::new());
        }

        // Items of exactly the sales selected above
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name, price, quantity
            FROM sale_items
            WHERE sale_id IN (
                SELECT id
                FROM sales
                WHERE created_at >= $1 AND created_at <= $2
                ORDER BY created_at DESC, id DESC
                LIMIT $3
            )
            ORDER BY sale_id, id
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await?;

        let mut by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::with_capacity(sales.len());
        for item in items {
            by_sale.entry(item.sale_id).or_default().push(item);
        }

        let report = sales
            .into_iter()
            .map(|sale| {
                let items = by_sale.remove(&sale.id).unwrap_or_default();
                SaleReport::new(sale, items)
            })
            .collect::<Vec<_>>();

        debug!(count = report.len(), "Sales report built");
        Ok(report)
    }

    /// Deletes a sale and (by cascade) its items.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no sale has this id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        debug!(id, "Deleted sale");
        Ok(())
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts recorded line items across all sales.
    pub async fn item_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use kasir_core::{LineItem, NewProduct, ProductUpdate};

    async fn setup_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn rice_checkout() -> Checkout {
        Checkout {
            items: vec![LineItem {
                product_id: 1,
                name: "Rice".to_string(),
                price: 50_000,
                quantity: 2,
            }],
            total: 100_000,
            paid: Some(150_000),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_record_example_checkout() {
        let db = setup_db().await;
        let sales = db.sales();

        let sale_id = sales.record(&rice_checkout()).await.unwrap();

        let sale = sales.get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total, 100_000);
        assert_eq!(sale.paid, Some(150_000));
        assert_eq!(sale.change, Some(50_000));

        let items = sales.items(sale_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].name, "Rice");
        assert_eq!(items[0].sale_id, sale_id);
    }

    #[tokio::test]
    async fn test_change_absent_without_paid() {
        let db = setup_db().await;
        let mut checkout = rice_checkout();
        checkout.paid = None;

        let sale_id = db.sales().record(&checkout).await.unwrap();
        let sale = db.sales().get_by_id(sale_id).await.unwrap().unwrap();

        assert_eq!(sale.paid, None);
        assert_eq!(sale.change, None);
    }

    #[tokio::test]
    async fn test_failed_item_insert_rolls_back_everything() {
        let db = setup_db().await;

        sqlx::query(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON sale_items \
             WHEN NEW.name = 'boom' BEGIN SELECT RAISE(ABORT, 'boom'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let mut checkout = rice_checkout();
        checkout.items.push(LineItem {
            product_id: 2,
            name: "boom".to_string(),
            price: 1,
            quantity: 1,
        });

        assert!(db.sales().record(&checkout).await.is_err());
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.sales().item_count().await.unwrap(), 0);

        // The pool is still usable afterwards
        assert!(db.sales().record(&rice_checkout()).await.is_ok());
    }

    #[tokio::test]
    async fn test_snapshots_survive_catalog_changes() {
        let db = setup_db().await;
        let product = db
            .products()
            .insert(&NewProduct::new("Gula 1kg", 12_000).unwrap())
            .await
            .unwrap();

        let sale_id = db.sales().record_from_catalog(product.id, 3).await.unwrap();

        let update = ProductUpdate::new(Some("Gula Pasir 1kg".to_string()), Some(14_000)).unwrap();
        db.products().update(product.id, &update).await.unwrap();
        db.products().delete(product.id).await.unwrap();

        let sale = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total, 36_000);
        assert_eq!(sale.paid, None);

        let items = db.sales().items(sale_id).await.unwrap();
        assert_eq!(items[0].name, "Gula 1kg");
        assert_eq!(items[0].price, 12_000);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].product_id, product.id);
    }

    #[tokio::test]
    async fn test_record_from_unknown_product() {
        let db = setup_db().await;

        let result = db.sales().record_from_catalog(42, 1).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_report_inclusive_range_newest_first() {
        let db = setup_db().await;
        let sales = db.sales();

        let before = sales.record_at(&rice_checkout(), at(2023, 12, 31, 23)).await.unwrap();
        let first = sales.record_at(&rice_checkout(), at(2024, 1, 1, 0)).await.unwrap();
        let middle = sales.record_at(&rice_checkout(), at(2024, 1, 15, 12)).await.unwrap();
        let last = sales.record_at(&rice_checkout(), at(2024, 1, 31, 0)).await.unwrap();
        let after = sales.record_at(&rice_checkout(), at(2024, 1, 31, 12)).await.unwrap();

        let filter = SalesFilter::from_query(Some("2024-01-01"), Some("2024-01-31"));
        let report = sales.report(&filter).await.unwrap();

        let ids: Vec<i64> = report.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![last, middle, first]);
        assert!(!ids.contains(&before));
        assert!(!ids.contains(&after));

        assert_eq!(report[0].items.len(), 1);
        assert_eq!(report[0].items[0].name, "Rice");
        assert_eq!(report[0].change, Some(50_000));
    }

    #[tokio::test]
    async fn test_report_caps_at_limit() {
        let db = setup_db().await;
        let sales = db.sales();

        for hour in 0..5 {
            sales.record_at(&rice_checkout(), at(2024, 1, 1, hour)).await.unwrap();
        }

        let filter = SalesFilter {
            limit: 3,
            ..SalesFilter::default()
        };
        let report = sales.report(&filter).await.unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report[0].created_at, at(2024, 1, 1, 4));
        assert_eq!(report[2].created_at, at(2024, 1, 1, 2));
        assert!(report.iter().all(|r| r.items.len() == 1));
    }

    #[tokio::test]
    async fn test_report_items_belong_to_selected_sales() {
        let db = setup_db().await;
        let sales = db.sales();

        let mut sugar = rice_checkout();
        sugar.items[0].name = "Sugar".to_string();

        // Ids interleave: the out-of-range sale sits between two selected ones
        let early = sales.record_at(&rice_checkout(), at(2024, 1, 2, 0)).await.unwrap();
        let outside = sales.record_at(&sugar, at(2024, 3, 1, 0)).await.unwrap();
        let late = sales.record_at(&rice_checkout(), at(2024, 1, 3, 0)).await.unwrap();
        assert!(early < outside && outside < late);

        let filter = SalesFilter::from_query(Some("2024-01-01"), Some("2024-01-31"));
        let report = sales.report(&filter).await.unwrap();

        let ids: Vec<i64> = report.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![late, early]);
        assert!(report
            .iter()
            .flat_map(|r| r.items.iter())
            .all(|item| item.name == "Rice"));
    }

    #[tokio::test]
    async fn test_report_empty() {
        let db = setup_db().await;
        let report = db.sales().report(&SalesFilter::default()).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let db = setup_db().await;
        let sale_id = db.sales().record(&rice_checkout()).await.unwrap();

        db.sales().delete(sale_id).await.unwrap();

        assert_eq!(db.sales().get_by_id(sale_id).await.unwrap(), None);
        assert_eq!(db.sales().item_count().await.unwrap(), 0);
        assert!(matches!(
            db.sales().delete(sale_id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
