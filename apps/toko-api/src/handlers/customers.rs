//! Customer registry endpoints: `/api/customers`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;
use toko_core::{Customer, CustomerPatch};

/// `GET /api/customers`
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Customer>>, ApiError> {
    let customers = state.db.customers().list().await?;
    Ok(ApiResponse::ok("Customers retrieved", customers))
}

/// `GET /api/customers/next-id`
pub async fn next_customer_id(
    State(state): State<AppState>,
) -> Result<ApiResponse<String>, ApiError> {
    let id = state.db.customers().next_id().await?;
    Ok(ApiResponse::ok("Next customer id", id))
}

/// `GET /api/customers/:id`
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Customer>, ApiError> {
    let customer = state
        .db
        .customers()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &id))?;
    Ok(ApiResponse::ok("Customer retrieved", customer))
}

/// `POST /api/customers`
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<ApiResponse<Customer>, ApiError> {
    let Json(customer) = payload?;
    let customer = state.db.customers().create(customer).await?;
    info!(id = %customer.id, "Customer created");
    Ok(ApiResponse::created("Customer created", customer))
}

/// `PUT /api/customers/:id`
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<ApiResponse<Customer>, ApiError> {
    let Json(patch) = payload?;
    let customer = state.db.customers().update(&id, patch).await?;
    Ok(ApiResponse::ok("Customer updated", customer))
}

/// `DELETE /api/customers/:id`
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state.db.customers().delete(&id).await?;
    info!(id = %id, "Customer deleted");
    Ok(ApiResponse::message("Customer deleted"))
}
