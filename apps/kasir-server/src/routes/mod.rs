//! # Routes
//!
//! Router assembly. Each submodule owns the handlers of one resource.

pub mod checkout;
pub mod health;
pub mod pages;
pub mod products;
pub mod sales;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the application router with every route and the trace layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML surface
        .route("/", get(pages::index))
        .route("/tambah_produk", post(pages::add_product))
        .route("/tambah_transaksi", post(pages::add_sale))
        .route("/api/produk", get(products::list_products))
        // JSON API
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/api/checkout", post(checkout::checkout))
        .route("/api/sales", get(sales::sales_report))
        // Operations
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
