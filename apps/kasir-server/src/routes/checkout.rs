//! Checkout endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use ts_rs::TS;

use kasir_core::{Checkout, CheckoutRequest};

use crate::error::ApiError;
use crate::AppState;

/// Body of a successful checkout.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CheckoutResponse {
    pub ok: bool,
    pub sale_id: i64,
}

/// POST /api/checkout
///
/// ```text
/// {"items":[{"id":1,"name":"Rice","price":50000,"quantity":2}],
///  "total":100000,"paid":150000}
///   → 201 {"ok":true,"sale_id":1}        (change = 50000)
/// ```
pub async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let Json(request) = payload?;
    let checkout = Checkout::from_request(&request)?;

    let sale_id = state.db.sales().record(&checkout).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse { ok: true, sale_id }),
    ))
}
