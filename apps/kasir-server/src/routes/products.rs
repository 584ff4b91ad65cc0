//! Product catalog endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;
use tracing::info;

use kasir_core::{CoreError, NewProduct, Product, ProductUpdate};
use kasir_db::DbError;

use crate::error::ApiError;
use crate::AppState;

/// `{"ok": true}` acknowledgement.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct OkResponse {
    pub ok: bool,
}

/// GET /api/products and GET /api/produk
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.db.products().list().await?))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(body) = payload?;
    let new_product = NewProduct::from_json(&body)?;

    let product = state
        .db
        .products()
        .insert(&new_product)
        .await
        .map_err(|e| product_error(e, None))?;

    info!(id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let update = ProductUpdate::from_json(&body)?;

    let product = state
        .db
        .products()
        .update(id, &update)
        .await
        .map_err(|e| product_error(e, Some(id)))?;

    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let Path(id) = id?;
    state
        .db
        .products()
        .delete(id)
        .await
        .map_err(|e| product_error(e, Some(id)))?;

    info!(id, "Product deleted");
    Ok(Json(OkResponse { ok: true }))
}

/// Names the product in not-found and duplicate errors.
pub(crate) fn product_error(err: DbError, id: Option<i64>) -> ApiError {
    match (err, id) {
        (DbError::NotFound { .. }, Some(id)) => CoreError::ProductNotFound(id).into(),
        (DbError::UniqueViolation { value, .. }, _) => CoreError::DuplicateProduct(value).into(),
        (other, _) => other.into(),
    }
}
