//! Catalog endpoints: `/api/products`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;
use toko_core::{Product, ProductPatch};

/// `GET /api/products`
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(ApiResponse::ok("Products retrieved", products))
}

/// `GET /api/products/next-id`
pub async fn next_product_code(
    State(state): State<AppState>,
) -> Result<ApiResponse<String>, ApiError> {
    let code = state.db.products().next_id().await?;
    Ok(ApiResponse::ok("Next product code", code))
}

/// `GET /api/products/:code`
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<ApiResponse<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &code))?;
    Ok(ApiResponse::ok("Product retrieved", product))
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<ApiResponse<Product>, ApiError> {
    let Json(product) = payload?;
    let product = state.db.products().create(product).await?;
    info!(code = %product.code, "Product created");
    Ok(ApiResponse::created("Product created", product))
}

/// `PUT /api/products/:code`
pub async fn update_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<ApiResponse<Product>, ApiError> {
    let Json(patch) = payload?;
    let product = state.db.products().update(&code, patch).await?;
    Ok(ApiResponse::ok("Product updated", product))
}

/// `DELETE /api/products/:code`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state.db.products().delete(&code).await?;
    info!(code = %code, "Product deleted");
    Ok(ApiResponse::message("Product deleted"))
}
