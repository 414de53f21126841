//! End-to-end tests driving the router against an in-memory database.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use toko_api::{router, AppState};
use toko_db::{Database, DbConfig};

/// Router plus the database behind it.
struct TestApp {
    router: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("failed to create test database");
        let router = router(AppState::new(db.clone()), Duration::from_secs(5));
        TestApp { router, db }
    }

    /// Loads two products and one customer.
    async fn with_catalog() -> Self {
        let app = TestApp::new().await;
        for body in [
            json!({"code": "BRG_1", "name": "PEN", "category": "ATK", "unit_price": 15000}),
            json!({"code": "BRG_2", "name": "PENSIL", "category": "ATK", "unit_price": 10000}),
        ] {
            let (status, _) = app.request(Method::POST, "/api/products", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, _) = app
            .request(
                Method::POST,
                "/api/customers",
                Some(json!({
                    "id": "PELANGGAN_1",
                    "name": "ANDI",
                    "domicile": "JAK-UT",
                    "gender": "PRIA"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        app
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("request")).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }
}

fn nota_1() -> Value {
    json!({
        "id": "NOTA_1",
        "date": "2018-01-01",
        "customer_id": "PELANGGAN_1",
        "items": [{"product_code": "BRG_1", "quantity": 2}]
    })
}

#[tokio::test]
async fn health_and_index() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.request(Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["endpoints"]["sales"], "/api/sales");
}

#[tokio::test]
async fn create_sale_returns_composed_detail() {
    let app = TestApp::with_catalog().await;

    let (status, body) = app.request(Method::POST, "/api/sales", Some(nota_1())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["subtotal"], 30000);
    assert_eq!(body["data"]["customer"]["name"], "ANDI");
    assert_eq!(body["data"]["items"][0]["product"]["unit_price"], 15000);

    let (status, body) = app.request(Method::GET, "/api/sales/NOTA_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["date"], "2018-01-01");
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn client_subtotal_is_ignored() {
    let app = TestApp::with_catalog().await;

    let mut sale = nota_1();
    sale["subtotal"] = json!(1);
    let (status, body) = app.request(Method::POST, "/api/sales", Some(sale)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["subtotal"], 30000);
}

#[tokio::test]
async fn empty_items_is_unprocessable() {
    let app = TestApp::with_catalog().await;

    let mut sale = nota_1();
    sale["items"] = json!([]);
    let (status, body) = app.request(Method::POST, "/api/sales", Some(sale)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, body) = app.request(Method::GET, "/api/sales", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn unknown_references_are_unprocessable() {
    let app = TestApp::with_catalog().await;

    let mut sale = nota_1();
    sale["items"] = json!([
        {"product_code": "BRG_1", "quantity": 1},
        {"product_code": "BRG_99", "quantity": 1}
    ]);
    let (status, body) = app.request(Method::POST, "/api/sales", Some(sale)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_REFERENCE");

    let mut sale = nota_1();
    sale["customer_id"] = json!("PELANGGAN_9");
    let (status, _) = app.request(Method::POST, "/api/sales", Some(sale)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.db.sales().count().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_sale_id_is_unprocessable() {
    let app = TestApp::with_catalog().await;

    app.request(Method::POST, "/api/sales", Some(nota_1())).await;
    let (status, body) = app.request(Method::POST, "/api/sales", Some(nota_1())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn update_replaces_items_or_keeps_them() {
    let app = TestApp::with_catalog().await;
    app.request(Method::POST, "/api/sales", Some(nota_1())).await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/sales/NOTA_1",
            Some(json!({"date": "2018-02-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subtotal"], 30000);
    assert_eq!(body["data"]["date"], "2018-02-01");

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/sales/NOTA_1",
            Some(json!({"items": [{"product_code": "BRG_2", "quantity": 3}]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subtotal"], 30000);
    assert_eq!(body["data"]["items"][0]["product_code"], "BRG_2");

    let (status, _) = app
        .request(Method::PUT, "/api/sales/NOTA_404", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_referenced_product_conflicts() {
    let app = TestApp::with_catalog().await;
    app.request(Method::POST, "/api/sales", Some(nota_1())).await;

    let (status, body) = app.request(Method::DELETE, "/api/products/BRG_1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = app.request(Method::DELETE, "/api/products/BRG_2", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request(Method::DELETE, "/api/customers/PELANGGAN_1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.request(Method::DELETE, "/api/sales/NOTA_1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.request(Method::DELETE, "/api/products/BRG_1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_body_is_unprocessable() {
    let app = TestApp::with_catalog().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sales")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/products",
            Some(json!({"code": "BRG_3", "name": "X", "category": "FOOD", "unit_price": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn lists_use_numeric_order_and_next_id() {
    let app = TestApp::with_catalog().await;
    for id in ["NOTA_10", "NOTA_2", "NOTA_9", "NOTA_1"] {
        let mut sale = nota_1();
        sale["id"] = json!(id);
        let (status, _) = app.request(Method::POST, "/api/sales", Some(sale)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.request(Method::GET, "/api/sales", None).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["NOTA_1", "NOTA_2", "NOTA_9", "NOTA_10"]);

    let (_, body) = app.request(Method::GET, "/api/sales/next-id", None).await;
    assert_eq!(body["data"], "NOTA_11");

    let (_, body) = app.request(Method::GET, "/api/products/next-id", None).await;
    assert_eq!(body["data"], "BRG_3");
}

#[tokio::test]
async fn dashboard_sums_subtotals() {
    let app = TestApp::with_catalog().await;
    app.request(Method::POST, "/api/sales", Some(nota_1())).await;

    let mut second = nota_1();
    second["id"] = json!("NOTA_2");
    second["items"] = json!([{"product_code": "BRG_2", "quantity": 5}]);
    app.request(Method::POST, "/api/sales", Some(second)).await;

    let (status, body) = app.request(Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_sales"], 2);
    assert_eq!(body["data"]["total_products"], 2);
    assert_eq!(body["data"]["total_customers"], 1);
    assert_eq!(body["data"]["total_revenue"], 80000);
}

#[tokio::test]
async fn missing_resources_are_not_found() {
    let app = TestApp::new().await;

    for uri in ["/api/products/BRG_1", "/api/customers/PELANGGAN_1", "/api/sales/NOTA_1"] {
        let (status, body) = app.request(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
