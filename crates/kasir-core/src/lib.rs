//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate contains the domain model and business rules of the cashier
//! backend as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 kasir-server (axum)                             │   │
//! │  │    /api/products  /api/checkout  /api/sales  /  (HTML)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │  report   │  │   │
//! │  │   │  Product  │  │   Money   │  │ lenient   │  │  bounds   │  │   │
//! │  │   │   Sale    │  │  change   │  │ parsing   │  │  filter   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │              SQL queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleItem, report rows)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - Permissive parsing of checkout requests
//! - [`report`] - Sales report filter and date bound parsing
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::money::Money;
//!
//! let total = Money::from_minor(100_000);
//! let paid = Money::from_minor(150_000);
//!
//! assert_eq!(paid.change_for(total).minor(), 50_000);
//! assert_eq!(total.to_string(), "100.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{Checkout, CheckoutRequest, LineItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::SalesFilter;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of sales returned by the sales report.
///
/// The report is newest-first, so this keeps the most recent sales.
pub const SALES_REPORT_LIMIT: u32 = 200;

/// Maximum length of a product name (matches the `products.name` column).
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
