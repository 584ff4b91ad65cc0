//! # Checkout
//!
//! Turns a raw checkout request into a validated [`Checkout`] ready to be
//! recorded by the sale repository.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/checkout                                                     │
//! │  {"items":[{"id":1,"name":"Rice","price":50000,"quantity":2}],          │
//! │   "total":100000, "paid":150000}                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutRequest (raw JSON values)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Checkout::from_request ← THIS MODULE                                   │
//! │       ├── items missing/empty?   → ValidationError::Empty               │
//! │       ├── total missing/null?    → ValidationError::Required            │
//! │       ├── total/paid not int?    → ValidationError::InvalidFormat       │
//! │       └── each item parsed leniently (defaults, never an error)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Checkout { items, total, paid } ── change() = paid - total             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Item Defaults
//! | field      | missing / unusable value |
//! |------------|--------------------------|
//! | `id`       | `0`                      |
//! | `name`     | `""`                     |
//! | `price`    | `0`                      |
//! | `quantity` | `1`                      |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::validation::{lenient_int, optional_int, required_int, ValidationResult};

// =============================================================================
// Request
// =============================================================================

/// Raw checkout body as sent by the cashier client.
///
/// Fields stay untyped so that the lenient coercion rules can be applied
/// after deserialization instead of failing the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub paid: Option<Value>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One requested line: a snapshot of what the client put on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl LineItem {
    /// Parses one element of the `items` array, substituting defaults for
    /// anything missing or unusable.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let obj = value.as_object().ok_or_else(|| ValidationError::InvalidFormat {
            field: "items".to_string(),
            reason: "each item must be an object".to_string(),
        })?;

        Ok(LineItem {
            product_id: obj.get("id").and_then(lenient_int).unwrap_or(0),
            name: obj
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            price: obj.get("price").and_then(lenient_int).unwrap_or(0),
            quantity: obj.get("quantity").and_then(lenient_int).unwrap_or(1),
        })
    }

    /// Snapshots a catalog product's current name and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }

    /// `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_minor(self.price).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// A validated checkout, ready to be persisted in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub items: Vec<LineItem>,
    /// Client-supplied total. Recorded as given.
    pub total: i64,
    pub paid: Option<i64>,
}

impl Checkout {
    /// Validates a raw request.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::{Checkout, CheckoutRequest};
    /// use serde_json::json;
    ///
    /// let request: CheckoutRequest = serde_json::from_value(json!({
    ///     "items": [{"id": 1, "name": "Rice", "price": 50000, "quantity": 2}],
    ///     "total": 100000,
    ///     "paid": 150000
    /// })).unwrap();
    ///
    /// let checkout = Checkout::from_request(&request).unwrap();
    /// assert_eq!(checkout.change(), Some(50_000));
    /// ```
    pub fn from_request(request: &CheckoutRequest) -> ValidationResult<Self> {
        let items = match request.items.as_ref() {
            None | Some(Value::Null) => return Err(empty_items()),
            Some(Value::Array(values)) if values.is_empty() => return Err(empty_items()),
            Some(Value::Array(values)) => values
                .iter()
                .map(LineItem::from_json)
                .collect::<ValidationResult<Vec<_>>>()?,
            Some(_) => {
                return Err(ValidationError::InvalidFormat {
                    field: "items".to_string(),
                    reason: "must be an array".to_string(),
                })
            }
        };

        let total = required_int(request.total.as_ref(), "total")?;
        let paid = optional_int(request.paid.as_ref(), "paid")?;

        Ok(Checkout { items, total, paid })
    }

    /// Single-line checkout for a catalog product, priced from the catalog.
    pub fn for_product(product: &Product, quantity: i64) -> Self {
        let item = LineItem::from_product(product, quantity);
        Checkout {
            total: item.line_total().minor(),
            items: vec![item],
            paid: None,
        }
    }

    /// `paid - total`, present only when `paid` was supplied.
    pub fn change(&self) -> Option<i64> {
        self.paid.map(|paid| {
            Money::from_minor(paid)
                .change_for(Money::from_minor(self.total))
                .minor()
        })
    }

    /// Sum of `price × quantity` over all line items.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// True when the client total agrees with the line items.
    pub fn total_matches_items(&self) -> bool {
        self.items_total().minor() == self.total
    }
}

fn empty_items() -> ValidationError {
    ValidationError::Empty {
        field: "items".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
