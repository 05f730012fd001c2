//! Review integration tests: nested routing under products and rating limits.

mod common;

use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn create_and_list_reviews_for_product() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;

    let response = harness
        .server
        .post(&format!("/products/{product_id}/reviews"))
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({
            "name": "Alice",
            "text": "Great roast.",
            "rating": 5
        }))
        .await;
    response.assert_status_ok();
    let created: serde_json::Value = response.json();
    assert_eq!(created["product_id"], product_id);
    assert_eq!(created["rating"], 5);

    let response = harness
        .server
        .get(&format!("/products/{product_id}/reviews"))
        .await;
    response.assert_status_ok();
    let reviews = response.json::<serde_json::Value>();
    let reviews = reviews.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["name"], "Alice");
}

#[tokio::test]
async fn review_under_missing_product_is_not_found() {
    let harness = TestHarness::new().await;

    harness
        .server
        .get("/products/999/reviews")
        .await
        .assert_status_not_found();

    harness
        .server
        .post("/products/999/reviews")
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({ "name": "Alice", "text": "Nice." }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn review_lookup_is_scoped_to_its_product() {
    let harness = TestHarness::new().await;
    let first = harness.create_product("Beans", 1000).await;
    let second = harness.create_product("Grounds", 800).await;

    let response = harness
        .server
        .post(&format!("/products/{first}/reviews"))
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({ "name": "Alice", "text": "Great roast." }))
        .await;
    response.assert_status_ok();
    let review_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    // The review exists under its own product but not under another.
    harness
        .server
        .get(&format!("/products/{first}/reviews/{review_id}"))
        .await
        .assert_status_ok();

    harness
        .server
        .get(&format!("/products/{second}/reviews/{review_id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn review_rating_outside_range_is_rejected() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;

    for rating in [0, 6] {
        let response = harness
            .server
            .post(&format!("/products/{product_id}/reviews"))
            .add_header("authorization", harness.staff_auth_header())
            .json(&json!({
                "name": "Alice",
                "text": "Great roast.",
                "rating": rating
            }))
            .await;
        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn review_without_rating_is_allowed() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;

    let response = harness
        .server
        .post(&format!("/products/{product_id}/reviews"))
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({ "name": "Alice", "text": "Great roast." }))
        .await;

    response.assert_status_ok();
    assert!(response.json::<serde_json::Value>()["rating"].is_null());
}

#[tokio::test]
async fn update_and_delete_review() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;

    let response = harness
        .server
        .post(&format!("/products/{product_id}/reviews"))
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({ "name": "Alice", "text": "Great roast.", "rating": 4 }))
        .await;
    response.assert_status_ok();
    let review_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    let response = harness
        .server
        .patch(&format!("/products/{product_id}/reviews/{review_id}"))
        .add_header("authorization", harness.staff_auth_header())
        .json(&json!({ "rating": 2 }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["rating"], 2);

    harness
        .server
        .delete(&format!("/products/{product_id}/reviews/{review_id}"))
        .add_header("authorization", harness.staff_auth_header())
        .await
        .assert_status_ok();

    harness
        .server
        .get(&format!("/products/{product_id}/reviews/{review_id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn review_writes_require_staff() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;

    harness
        .server
        .post(&format!("/products/{product_id}/reviews"))
        .json(&json!({ "name": "Alice", "text": "Great roast." }))
        .await
        .assert_status_unauthorized();

    harness
        .server
        .post(&format!("/products/{product_id}/reviews"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "name": "Alice", "text": "Great roast." }))
        .await
        .assert_status_forbidden();
}
