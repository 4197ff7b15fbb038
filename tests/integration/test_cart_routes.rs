//! Cart route tests.
//!
//! - POST /carts
//! - GET /carts/{id}
//! - PUT /carts/{id}/country
//! - GET /carts/{id}/items-table
//! - POST /carts/{id}/line-items
//! - PUT /carts/{id}/items/{itemId}/quantity
//! - DELETE /carts/{id}/items/{itemId}

use axum::http::StatusCode;
use axum_test::TestServer;
use commerce_console_api::routes::{AppState, create_api_router};
use commerce_console_api::storage::InMemoryBackend;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

fn create_test_server() -> TestServer {
    let prices = HashMap::from([("MUG-1".to_string(), 1250)]);
    let backend = Arc::new(InMemoryBackend::with_prices(prices));
    let router = create_api_router().with_state(AppState::new(backend, "en"));
    TestServer::new(router).unwrap()
}

async fn create_cart(server: &TestServer) -> Value {
    let response = server
        .post("/carts")
        .json(&json!({ "currency": "EUR", "country": "DE" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_create_and_get_cart() {
    let server = create_test_server();
    let cart = create_cart(&server).await;
    assert_eq!(cart["version"], 1);
    assert_eq!(cart["totalPrice"]["currencyCode"], "EUR");

    let id = cart["id"].as_str().unwrap();
    let response = server.get(&format!("/carts/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["country"], "DE");
}

#[tokio::test]
async fn test_create_cart_without_country_fails_validation() {
    let server = create_test_server();
    let response = server
        .post("/carts")
        .json(&json!({ "currency": "EUR" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["details"]["errors"][0]["field"], "country");
    assert_eq!(body["details"]["errors"][0]["kind"], "MISSING");
}

#[tokio::test]
async fn test_change_country() {
    let server = create_test_server();
    let cart = create_cart(&server).await;
    let id = cart["id"].as_str().unwrap();

    let response = server
        .put(&format!("/carts/{}/country", id))
        .json(&json!({ "version": 1, "country": "DE" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "unchanged");

    let response = server
        .put(&format!("/carts/{}/country", id))
        .json(&json!({ "version": 1, "country": "AT" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "updated");
    assert_eq!(body["cart"]["country"], "AT");
    assert_eq!(body["cart"]["version"], 2);

    // The client still holds version 1
    let response = server
        .put(&format!("/carts/{}/country", id))
        .json(&json!({ "version": 1, "country": "CH" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_line_item_flow_and_items_table() {
    let server = create_test_server();
    let cart = create_cart(&server).await;
    let id = cart["id"].as_str().unwrap();

    let response = server
        .post(&format!("/carts/{}/line-items", id))
        .json(&json!({ "version": 1, "sku": "MUG-1", "quantity": 2 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "updated");
    assert_eq!(body["actions"][0]["addLineItem"]["sku"], "MUG-1");
    assert_eq!(body["cart"]["totalPrice"]["centAmount"], 2500);
    let item_id = body["cart"]["lineItems"][0]["id"].as_str().unwrap().to_string();

    let response = server
        .get(&format!("/carts/{}/items-table", id))
        .add_query_param("editable", true)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let table: Value = response.json();
    let keys: Vec<&str> = table["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec![
            "name",
            "price",
            "quantity",
            "subtotalPrice",
            "taxRate",
            "totalPrice",
            "actions"
        ]
    );
    assert_eq!(table["rows"][0]["itemId"], item_id.as_str());
    assert_eq!(table["rows"][0]["cells"][0]["reference"], "MUG-1");

    let response = server
        .put(&format!("/carts/{}/items/{}/quantity", id, item_id))
        .json(&json!({ "version": 2, "quantity": 0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .put(&format!("/carts/{}/items/{}/quantity", id, item_id))
        .json(&json!({ "version": 2, "quantity": 4 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body["actions"][0]["changeLineItemQuantity"]["quantity"],
        4
    );
    assert_eq!(body["cart"]["totalPrice"]["centAmount"], 5000);

    let response = server
        .delete(&format!("/carts/{}/items/{}", id, item_id))
        .add_query_param("version", 3)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["cart"]["lineItems"], json!([]));
}

#[tokio::test]
async fn test_missing_cart_and_item() {
    let server = create_test_server();
    let response = server.get("/carts/unknown").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let cart = create_cart(&server).await;
    let id = cart["id"].as_str().unwrap();
    let response = server
        .delete(&format!("/carts/{}/items/unknown", id))
        .add_query_param("version", 1)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
