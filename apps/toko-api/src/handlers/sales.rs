//! Sale endpoints: `/api/sales`.
//!
//! Every response carries the composed sale: header, nested customer, and
//! line items each joined to their product.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;
use toko_core::sale::{NewSale, SalePatch};
use toko_core::SaleDetail;

/// `GET /api/sales`
pub async fn list_sales(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<SaleDetail>>, ApiError> {
    let sales = state.db.sales().list().await?;
    Ok(ApiResponse::ok("Sales retrieved", sales))
}

/// `GET /api/sales/next-id`
pub async fn next_sale_id(State(state): State<AppState>) -> Result<ApiResponse<String>, ApiError> {
    let id = state.db.sales().next_id().await?;
    Ok(ApiResponse::ok("Next sale id", id))
}

/// `GET /api/sales/:id`
pub async fn show_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<SaleDetail>, ApiError> {
    let sale = state.db.sales().show(&id).await?;
    Ok(ApiResponse::ok("Sale retrieved", sale))
}

/// `POST /api/sales`
///
/// The subtotal is never read from the body; it is computed from current
/// product prices.
pub async fn create_sale(
    State(state): State<AppState>,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> Result<ApiResponse<SaleDetail>, ApiError> {
    let Json(new_sale) = payload?;
    let sale = state.db.sales().create(new_sale).await?;
    Ok(ApiResponse::created("Sale created", sale))
}

/// `PUT /api/sales/:id`
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SalePatch>, JsonRejection>,
) -> Result<ApiResponse<SaleDetail>, ApiError> {
    let Json(patch) = payload?;
    let sale = state.db.sales().update(&id, patch).await?;
    Ok(ApiResponse::ok("Sale updated", sale))
}

/// `DELETE /api/sales/:id`
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state.db.sales().delete(&id).await?;
    Ok(ApiResponse::message("Sale deleted"))
}
