//! Server-rendered index page and its form posts.
//!
//! ## Flow
//! ```text
//! GET  /                  ──► index.html (catalog + two forms)
//! POST /tambah_produk     ──► ok: 303 → /    err: 400 index.html + message
//! POST /tambah_transaksi  ──► ok: 303 → /    err: 400/404 index.html + message
//! ```

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use kasir_core::validation::required_int;
use kasir_core::{NewProduct, Product, ValidationError};

use crate::error::ApiError;
use crate::routes::products::product_error;
use crate::AppState;

// =============================================================================
// Templates
// =============================================================================

/// One catalog row as shown on the page.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: String,
}

impl From<Product> for ProductRow {
    fn from(product: Product) -> Self {
        ProductRow {
            price: product.price().to_string(),
            id: product.id,
            name: product.name,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub products: Vec<ProductRow>,
    pub error: Option<String>,
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddProductForm {
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub harga: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSaleForm {
    #[serde(default)]
    pub produk_id: Option<String>,
    #[serde(default)]
    pub jumlah: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /
pub async fn index(State(state): State<AppState>) -> Response {
    render_index(&state, StatusCode::OK, None).await
}

/// POST /tambah_produk
pub async fn add_product(
    State(state): State<AppState>,
    form: Result<Form<AddProductForm>, FormRejection>,
) -> Response {
    match try_add_product(&state, form).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => render_index(&state, e.status(), Some(e.message)).await,
    }
}

async fn try_add_product(
    state: &AppState,
    form: Result<Form<AddProductForm>, FormRejection>,
) -> Result<(), ApiError> {
    let Form(form) = form?;
    let new_product = NewProduct::from_json(&json!({
        "name": form.nama,
        "price": form.harga,
    }))?;

    let product = state
        .db
        .products()
        .insert(&new_product)
        .await
        .map_err(|e| product_error(e, None))?;

    info!(id = product.id, name = %product.name, "Product added from form");
    Ok(())
}

/// POST /tambah_transaksi
pub async fn add_sale(
    State(state): State<AppState>,
    form: Result<Form<AddSaleForm>, FormRejection>,
) -> Response {
    match try_add_sale(&state, form).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => render_index(&state, e.status(), Some(e.message)).await,
    }
}

async fn try_add_sale(
    state: &AppState,
    form: Result<Form<AddSaleForm>, FormRejection>,
) -> Result<(), ApiError> {
    let Form(form) = form?;
    let product_id = required_int(form.produk_id.map(Value::String).as_ref(), "produk_id")?;
    let quantity = required_int(form.jumlah.map(Value::String).as_ref(), "jumlah")?;

    if quantity < 1 {
        return Err(ValidationError::OutOfRange {
            field: "jumlah".to_string(),
            min: 1,
            max: i64::MAX,
        }
        .into());
    }

    let sale_id = state
        .db
        .sales()
        .record_from_catalog(product_id, quantity)
        .await
        .map_err(|e| product_error(e, Some(product_id)))?;

    info!(sale_id, product_id, quantity, "Sale added from form");
    Ok(())
}

/// Renders the index with the current catalog.
async fn render_index(state: &AppState, status: StatusCode, error: Option<String>) -> Response {
    let products = match state.db.products().list().await {
        Ok(products) => products.into_iter().map(ProductRow::from).collect(),
        Err(e) => return ApiError::from(e).into_response(),
    };

    (status, IndexTemplate { products, error }).into_response()
}
