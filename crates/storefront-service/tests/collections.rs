//! Collection integration tests: live product counts and the deletion guard.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn collection_listing_carries_live_product_count() {
    let harness = TestHarness::new().await;
    let collection_id = harness.create_collection("Coffee").await;

    harness
        .server
        .post("/products")
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({
            "title": "Beans",
            "unit_price_cents": 1000,
            "collection_id": collection_id
        }))
        .await
        .assert_status_ok();

    let response = harness.server.get("/collections").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let collections = body.as_array().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0]["products_count"], 1);
}

#[tokio::test]
async fn collection_count_tracks_product_deletion() {
    let harness = TestHarness::new().await;
    let collection_id = harness.create_collection("Coffee").await;

    let response = harness
        .server
        .post("/products")
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({
            "title": "Beans",
            "unit_price_cents": 1000,
            "collection_id": collection_id
        }))
        .await;
    response.assert_status_ok();
    let product_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    harness
        .server
        .delete(&format!("/products/{product_id}"))
        .add_header("authorization", harness.staff_auth_header())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get(&format!("/collections/{collection_id}"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["products_count"], 0);
}

#[tokio::test]
async fn delete_collection_with_products_is_blocked() {
    let harness = TestHarness::new().await;
    let collection_id = harness.create_collection("Coffee").await;

    harness
        .server
        .post("/products")
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({
            "title": "Beans",
            "unit_price_cents": 1000,
            "collection_id": collection_id
        }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .delete(&format!("/collections/{collection_id}"))
        .add_header("authorization", harness.staff_auth_header())
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["Error"],
        "Collection cannot be deleted because it includes one or more products."
    );

    // The collection survives the attempt.
    harness
        .server
        .get(&format!("/collections/{collection_id}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn delete_empty_collection_succeeds() {
    let harness = TestHarness::new().await;
    let collection_id = harness.create_collection("Coffee").await;

    harness
        .server
        .delete(&format!("/collections/{collection_id}"))
        .add_header("authorization", harness.staff_auth_header())
        .await
        .assert_status_ok();

    harness
        .server
        .get(&format!("/collections/{collection_id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn collection_writes_require_staff() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post("/collections")
        .json(&json!({ "title": "Coffee" }))
        .await
        .assert_status_unauthorized();

    harness
        .server
        .post("/collections")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "title": "Coffee" }))
        .await
        .assert_status_forbidden();
}

#[tokio::test]
async fn collection_search_filters_by_title() {
    let harness = TestHarness::new().await;
    harness.create_collection("Coffee").await;
    harness.create_collection("Tea").await;

    let response = harness.server.get("/collections?search=cof").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let collections = body.as_array().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0]["title"], "Coffee");
}
