//! # Toko API
//!
//! REST server for the Toko admin front-end.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Toko API Server                                │
//! │                                                                         │
//! │  Browser ──► axum Router ──► handlers ──► toko-db ──► SQLite           │
//! │                  │                                                      │
//! │                  ├── TraceLayer    (one span per request)              │
//! │                  ├── TimeoutLayer  (408 TIMEOUT envelope)              │
//! │                  └── CorsLayer     (front-end served elsewhere)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::routing::get;
use axum::Router;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::handlers::{customers, products, sales, system};
use toko_db::Database;

pub use crate::config::{ApiConfig, ConfigError};
pub use crate::error::{ApiError, ErrorCode};
pub use crate::response::ApiResponse;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the full router with middleware.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let api = Router::new()
        .route("/", get(system::index))
        .route("/dashboard", get(system::dashboard))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/next-id", get(products::next_product_code))
        .route(
            "/products/:code",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/customers/next-id", get(customers::next_customer_id))
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/sales/next-id", get(sales::next_sale_id))
        .route(
            "/sales/:id",
            get(sales::show_sale)
                .put(sales::update_sale)
                .delete(sales::delete_sale),
        );

    let routes = Router::new()
        .route("/health", get(system::health))
        .nest("/api", api)
        .with_state(state);

    with_middleware(routes, request_timeout)
}

/// Wraps routes in the timeout, CORS and trace layers.
fn with_middleware(routes: Router, request_timeout: Duration) -> Router {
    routes
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(error::handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,toko=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_timeout_answers_with_envelope() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

        let response = with_middleware(slow, Duration::from_millis(20))
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "TIMEOUT");
    }
}
