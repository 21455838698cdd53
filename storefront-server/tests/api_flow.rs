//! End-to-end API tests over an in-memory database.
//!
//! Each test builds the full middleware stack and drives it with
//! `tower::ServiceExt::oneshot`, asserting on status codes and JSON
//! bodies the way a client would see them.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use storefront_server::api::build_app;
use storefront_server::core::{Config, ServerState};

async fn app() -> Router {
    let config = Config::with_overrides("/tmp/storefront-test", 0);
    let state = ServerState::in_memory(config)
        .await
        .expect("in-memory state");
    build_app(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a category and a product with initial stock, returning the
/// product id.
async fn seed_product(app: &Router, name: &str, stock: i64) -> String {
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/categories",
            json!({"name": "Drinks"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let category = body_json(response).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/products",
            json!({
                "name": name,
                "price": 3.5,
                "category": category_id,
                "initialStock": stock,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product = body_json(response).await;
    assert_eq!(product["available"].as_i64().unwrap(), stock);
    product["id"].as_str().unwrap().to_string()
}

async fn available(app: &Router, product_id: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(get(&format!("/api/products/{product_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["available"].as_i64().unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn product_listing_includes_derived_stock() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 7).await;

    let response = app.clone().oneshot(get("/api/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let listed = body
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == pid.as_str())
        .expect("seeded product listed");
    assert_eq!(listed["available"].as_i64().unwrap(), 7);
}

#[tokio::test]
async fn product_create_requires_existing_category() {
    let app = app().await;
    let response = app
        .oneshot(send_json(
            "POST",
            "/api/products",
            json!({
                "name": "Orphan",
                "price": 1.0,
                "category": "category:missing",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "E0003");
}

#[tokio::test]
async fn checkout_reduces_availability_and_persists_order() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 5).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            json!({
                "userId": "user:alice",
                "items": [{"productId": pid, "quantity": 3}],
                "total": 10.5,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["items"][0]["quantity"].as_i64().unwrap(), 3);
    assert!(order["items"][0]["movementId"].is_string());

    assert_eq!(available(&app, &pid).await, 2);

    let response = app
        .clone()
        .oneshot(get("/api/orders?user_id=user:alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let orders = body_json(response).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn checkout_over_stock_is_refused_with_detail() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 2).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            json!({
                "userId": "user:alice",
                "items": [{"productId": pid, "quantity": 5}],
                "total": 17.5,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E1001");
    assert_eq!(body["data"]["available"].as_i64().unwrap(), 2);
    assert_eq!(body["data"]["requested"].as_i64().unwrap(), 5);

    // Nothing was reserved
    assert_eq!(available(&app, &pid).await, 2);
}

#[tokio::test]
async fn rejecting_an_order_restores_stock() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 5).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            json!({
                "userId": "user:alice",
                "items": [{"productId": pid, "quantity": 4}],
                "total": 14.0,
            }),
        ))
        .await
        .unwrap();
    let order_id = body_json(response).await["id"].as_str().unwrap().to_string();
    assert_eq!(available(&app, &pid).await, 1);

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            json!({"status": "rejected"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["order"]["status"], "REJECTED");
    assert!(outcome["items"][0]["ok"].as_bool().unwrap());

    assert_eq!(available(&app, &pid).await, 5);
}

#[tokio::test]
async fn decision_is_exactly_once() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 5).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            json!({
                "userId": "user:alice",
                "items": [{"productId": pid, "quantity": 1}],
                "total": 3.5,
            }),
        ))
        .await
        .unwrap();
    let order_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            json!({"status": "accepted"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            json!({"status": "rejected"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "E1002");
}

#[tokio::test]
async fn invalid_decision_payload_is_rejected() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 5).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            json!({
                "userId": "user:alice",
                "items": [{"productId": pid, "quantity": 1}],
                "total": 3.5,
            }),
        ))
        .await
        .unwrap();
    let order_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            json!({"status": "pending"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "E0002");
}

#[tokio::test]
async fn confirm_stock_after_acceptance_reports_partial_failure() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 5).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            json!({
                "userId": "user:alice",
                "items": [{"productId": pid, "quantity": 2}],
                "total": 7.0,
            }),
        ))
        .await
        .unwrap();
    let order_id = body_json(response).await["id"].as_str().unwrap().to_string();

    // Acceptance confirms the reservation
    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            json!({"status": "accepted"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A second confirm finds no pending movement to settle
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/orders/{order_id}/confirm-stock"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E1003");
    assert!(!body["data"]["items"][0]["ok"].as_bool().unwrap());
}

#[tokio::test]
async fn return_stock_restores_availability_without_deciding() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 4).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            json!({
                "userId": "user:alice",
                "items": [{"productId": pid, "quantity": 4}],
                "total": 14.0,
            }),
        ))
        .await
        .unwrap();
    let order_id = body_json(response).await["id"].as_str().unwrap().to_string();
    assert_eq!(available(&app, &pid).await, 0);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/api/orders/{order_id}/return-stock"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(available(&app, &pid).await, 4);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/orders/{order_id}")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["status"], "PENDING");
}

#[tokio::test]
async fn stock_adjustment_moves_availability_to_target() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 5).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/products/{pid}/stock"),
            json!({"target": 12}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(available(&app, &pid).await, 12);

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/products/{pid}/stock"),
            json!({"target": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(available(&app, &pid).await, 3);

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/products/{pid}/stock"),
            json!({"target": -1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cart_round_trip() {
    let app = app().await;
    let pid = seed_product(&app, "Espresso", 5).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/cart",
            json!({"userId": "user:alice", "productId": pid, "quantity": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Same line again accumulates
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/cart",
            json!({"userId": "user:alice", "productId": pid, "quantity": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let entry = body_json(response).await;
    assert_eq!(entry["quantity"].as_i64().unwrap(), 3);
    let entry_id = entry["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get("/api/cart/user:alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/cart/{entry_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/cart/user:alice"))
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_order_and_product_are_not_found() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(get("/api/orders/orders:missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get("/api/products/product:missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
