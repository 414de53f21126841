//! Endpoint index, health check and dashboard.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;
use toko_core::DashboardSummary;

/// `GET /api` lists the available resources.
pub async fn index() -> ApiResponse<serde_json::Value> {
    ApiResponse::ok(
        "Toko API",
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "dashboard": "/api/dashboard",
                "products": "/api/products",
                "customers": "/api/customers",
                "sales": "/api/sales",
            }
        }),
    )
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}

/// `GET /api/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<ApiResponse<DashboardSummary>, ApiError> {
    let summary = state.db.dashboard().summary().await?;
    Ok(ApiResponse::ok("Dashboard summary", summary))
}
