//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name (unique)  │   │  created_at     │   │  sale_id (FK)   │       │
//! │  │  price          │   │  total          │   │  product_id     │       │
//! │  └─────────────────┘   │  paid?          │   │  name  (frozen) │       │
//! │                        │  change?        │   │  price (frozen) │       │
//! │                        └─────────────────┘   │  quantity       │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  SaleReport = Sale + [ReportItem { name, price, quantity }]            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `SaleItem` copies the product's name and price at checkout time. Later
//! catalog edits or deletions never rewrite recorded sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    optional_int, optional_str, required_int, validate_price, validate_product_name,
    ValidationResult,
};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Database identity.
    pub id: i64,

    /// Display name, unique across the catalog.
    pub name: String,

    /// Current price in minor units.
    pub price: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
}

impl NewProduct {
    /// Validates name and price.
    ///
    /// ```rust
    /// use kasir_core::NewProduct;
    ///
    /// assert!(NewProduct::new("Gula 1kg", 12_000).is_ok());
    /// assert!(NewProduct::new("", 12_000).is_err());
    /// assert!(NewProduct::new("Gula 1kg", -1).is_err());
    /// ```
    pub fn new(name: impl Into<String>, price: i64) -> ValidationResult<Self> {
        let name = name.into();
        validate_product_name(&name)?;
        validate_price(price)?;
        Ok(NewProduct { name, price })
    }

    /// Parses a `{name, price}` JSON body. `price` may be a numeric string.
    pub fn from_json(body: &Value) -> ValidationResult<Self> {
        let name = optional_str(body.get("name"), "name")?
            .ok_or_else(|| ValidationError::required("name"))?;
        let price = required_int(body.get("price"), "price")?;
        Self::new(name, price)
    }
}

/// Partial update of a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
}

impl ProductUpdate {
    /// Builds an update, dropping an empty name and validating what remains.
    pub fn new(name: Option<String>, price: Option<i64>) -> ValidationResult<Self> {
        let name = name.filter(|n| !n.trim().is_empty());
        if let Some(ref n) = name {
            validate_product_name(n)?;
        }
        if let Some(p) = price {
            validate_price(p)?;
        }
        Ok(ProductUpdate { name, price })
    }

    /// Parses a `{name?, price?}` JSON body.
    pub fn from_json(body: &Value) -> ValidationResult<Self> {
        let name = optional_str(body.get("name"), "name")?.map(str::to_string);
        let price = optional_int(body.get("price"), "price")?;
        Self::new(name, price)
    }

    /// True when neither field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }

    /// Overwrites the supplied fields on `product`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(ref name) = self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    /// Assigned by the server at checkout, UTC.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Client-supplied total in minor units.
    pub total: i64,
    /// Amount tendered, if the cashier entered one.
    pub paid: Option<i64>,
    /// `paid - total`, present exactly when `paid` is.
    pub change: Option<i64>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    /// Copied from the request, not a live reference into `products`.
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price at time of sale (frozen).
    pub price: i64,
    pub quantity: i64,
}

impl SaleItem {
    /// Returns `price × quantity` as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_minor(self.price).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// Line item as exposed by the sales report (no internal identifiers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportItem {
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl From<SaleItem> for ReportItem {
    fn from(item: SaleItem) -> Self {
        ReportItem {
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// One row of the sales report: the sale header with its nested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleReport {
    pub id: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total: i64,
    pub paid: Option<i64>,
    pub change: Option<i64>,
    pub items: Vec<ReportItem>,
}

impl SaleReport {
    /// Combines a sale with its items.
    pub fn new(sale: Sale, items: Vec<SaleItem>) -> Self {
        SaleReport {
            id: sale.id,
            created_at: sale.created_at,
            total: sale.total,
            paid: sale.paid,
            change: sale.change,
            items: items.into_iter().map(ReportItem::from).collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn beras() -> Product {
        Product {
            id: 1,
            name: "Beras 5kg".to_string(),
            price: 50_000,
        }
    }

    #[test]
    fn test_new_product_from_json() {
        let product = NewProduct::from_json(&serde_json::json!({
            "name": "Telur 1kg",
            "price": "25000"
        }))
        .unwrap();
        assert_eq!(product.name, "Telur 1kg");
        assert_eq!(product.price, 25_000);

        let missing_price = NewProduct::from_json(&serde_json::json!({"name": "Telur"}));
        assert_eq!(missing_price, Err(ValidationError::required("price")));

        let missing_name = NewProduct::from_json(&serde_json::json!({"price": 1}));
        assert_eq!(missing_name, Err(ValidationError::required("name")));
    }

    #[test]
    fn test_product_update_from_json() {
        let update = ProductUpdate::from_json(&serde_json::json!({"price": 55000})).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.price, Some(55_000));

        let update = ProductUpdate::from_json(&serde_json::json!({"name": ""})).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_product_update_only_price() {
        let mut product = beras();
        let update = ProductUpdate::new(None, Some(55_000)).unwrap();
        update.apply_to(&mut product);

        assert_eq!(product.name, "Beras 5kg");
        assert_eq!(product.price, 55_000);
    }

    #[test]
    fn test_product_update_empty_name_is_ignored() {
        let update = ProductUpdate::new(Some("  ".to_string()), None).unwrap();
        assert!(update.is_empty());

        let mut product = beras();
        update.apply_to(&mut product);
        assert_eq!(product, beras());
    }

    #[test]
    fn test_product_update_rejects_negative_price() {
        assert!(ProductUpdate::new(None, Some(-1)).is_err());
    }

    #[test]
    fn test_sale_item_line_total() {
        let item = SaleItem {
            id: 1,
            sale_id: 1,
            product_id: 1,
            name: "Rice".to_string(),
            price: 50_000,
            quantity: 2,
        };
        assert_eq!(item.line_total().minor(), 100_000);
    }

    #[test]
    fn test_sale_report_hides_item_identifiers() {
        let sale = Sale {
            id: 7,
            created_at: Utc::now(),
            total: 100_000,
            paid: Some(150_000),
            change: Some(50_000),
        };
        let item = SaleItem {
            id: 3,
            sale_id: 7,
            product_id: 1,
            name: "Rice".to_string(),
            price: 50_000,
            quantity: 2,
        };

        let report = SaleReport::new(sale, vec![item]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["change"], 50_000);
        assert_eq!(
            json["items"],
            serde_json::json!([{"name": "Rice", "price": 50000, "quantity": 2}])
        );
    }
}
