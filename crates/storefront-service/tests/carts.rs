//! Cart integration tests: anonymous carts, item merging, and the
//! restricted verb set on cart items.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn create_cart_starts_empty() {
    let harness = TestHarness::new().await;

    let response = harness.server.post("/carts").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert!(body["id"].is_string());
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_cents"], 0);
}

#[tokio::test]
async fn adding_same_product_twice_merges_quantities() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;

    harness.add_cart_item(&cart_id, product_id, 2).await;
    harness.add_cart_item(&cart_id, product_id, 2).await;

    let response = harness.server.get(&format!("/carts/{cart_id}")).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let items = body["items"].as_array().unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 4);
    assert_eq!(body["total_cents"], 4000);
}

#[tokio::test]
async fn cart_total_sums_across_products() {
    let harness = TestHarness::new().await;
    let beans = harness.create_product("Beans", 1000).await;
    let grounds = harness.create_product("Grounds", 250).await;
    let cart_id = harness.create_cart().await;

    harness.add_cart_item(&cart_id, beans, 1).await;
    harness.add_cart_item(&cart_id, grounds, 3).await;

    let response = harness.server.get(&format!("/carts/{cart_id}")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["total_cents"], 1750);
}

#[tokio::test]
async fn add_item_for_unknown_product_is_rejected() {
    let harness = TestHarness::new().await;
    let cart_id = harness.create_cart().await;

    let response = harness
        .server
        .post(&format!("/carts/{cart_id}/items"))
        .json(&json!({ "product_id": 999, "quantity": 1 }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn add_item_with_zero_quantity_is_rejected() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;

    let response = harness
        .server
        .post(&format!("/carts/{cart_id}/items"))
        .json(&json!({ "product_id": product_id, "quantity": 0 }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn items_under_missing_cart_are_not_found() {
    let harness = TestHarness::new().await;
    let missing = uuid::Uuid::new_v4();

    harness
        .server
        .get(&format!("/carts/{missing}/items"))
        .await
        .assert_status_not_found();

    harness
        .server
        .post(&format!("/carts/{missing}/items"))
        .json(&json!({ "product_id": 1, "quantity": 1 }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn patch_item_changes_quantity_only() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;
    harness.add_cart_item(&cart_id, product_id, 1).await;

    let response = harness.server.get(&format!("/carts/{cart_id}/items")).await;
    response.assert_status_ok();
    let items = response.json::<serde_json::Value>();
    let item_id = items.as_array().unwrap()[0]["id"].as_i64().unwrap();

    let response = harness
        .server
        .patch(&format!("/carts/{cart_id}/items/{item_id}"))
        .json(&json!({ "quantity": 7 }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["quantity"], 7);
    assert_eq!(body["product_id"], product_id);
}

#[tokio::test]
async fn put_on_cart_item_is_method_not_allowed() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;
    harness.add_cart_item(&cart_id, product_id, 1).await;

    let response = harness.server.get(&format!("/carts/{cart_id}/items")).await;
    let items = response.json::<serde_json::Value>();
    let item_id = items.as_array().unwrap()[0]["id"].as_i64().unwrap();

    let response = harness
        .server
        .put(&format!("/carts/{cart_id}/items/{item_id}"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn delete_item_removes_it_from_cart() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;
    harness.add_cart_item(&cart_id, product_id, 2).await;

    let response = harness.server.get(&format!("/carts/{cart_id}/items")).await;
    let items = response.json::<serde_json::Value>();
    let item_id = items.as_array().unwrap()[0]["id"].as_i64().unwrap();

    harness
        .server
        .delete(&format!("/carts/{cart_id}/items/{item_id}"))
        .await
        .assert_status_ok();

    let response = harness.server.get(&format!("/carts/{cart_id}")).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_cents"], 0);
}

#[tokio::test]
async fn delete_cart_removes_cart_and_items() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;
    harness.add_cart_item(&cart_id, product_id, 1).await;

    harness
        .server
        .delete(&format!("/carts/{cart_id}"))
        .await
        .assert_status_ok();

    harness
        .server
        .get(&format!("/carts/{cart_id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn cart_lookup_with_malformed_token_is_rejected() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/carts/not-a-uuid").await;

    // The rejection uses the service's JSON envelope, not a plain-text body.
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}
