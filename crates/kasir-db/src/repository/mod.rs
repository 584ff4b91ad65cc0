//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handler                                                           │
//! │       │                                                                 │
//! │       │  state.db.sales().record(&checkout)                             │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── record(&self, checkout)          (one transaction)                 │
//! │  ├── record_from_catalog(&self, id, qty)                                │
//! │  └── report(&self, filter)                                              │
//! │       │                                                                 │
//! │       │  SQL ($1, $2 placeholders, valid on SQLite and PostgreSQL)     │
//! │       ▼                                                                 │
//! │  AnyPool                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD with unique names
//! - [`sale::SaleRepository`] - Checkout recording and the sales report

pub mod product;
pub mod sale;
