//! Customer integration tests: the self-service `/customers/me` surface,
//! owner-or-staff access, and the permission-gated history action.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn me_creates_profile_on_first_access() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let first: serde_json::Value = response.json();
    assert_eq!(first["user_id"], harness.test_user_id.to_string());
    assert!(first["phone"].is_null());

    // A second call returns the same profile rather than minting a new one.
    let response = harness
        .server
        .get("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["id"], first["id"]);
}

#[tokio::test]
async fn me_requires_authentication() {
    let harness = TestHarness::new().await;

    harness
        .server
        .get("/customers/me")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn update_me_sets_profile_fields() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "phone": "555-0100", "birth_date": "1990-04-01" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["phone"], "555-0100");
    assert_eq!(body["birth_date"], "1990-04-01");
}

#[tokio::test]
async fn update_me_rejects_malformed_birth_date() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "birth_date": "01/04/1990" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn profile_is_owner_or_staff() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let customer_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    // The owner can read their own profile by id.
    harness
        .server
        .get(&format!("/customers/{customer_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    // A different non-staff user cannot.
    harness
        .server
        .get(&format!("/customers/{customer_id}"))
        .add_header("authorization", TestHarness::other_user_auth_header())
        .await
        .assert_status_forbidden();

    // Staff can.
    harness
        .server
        .get(&format!("/customers/{customer_id}"))
        .add_header("authorization", harness.staff_auth_header())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn missing_customer_is_not_found() {
    let harness = TestHarness::new().await;

    harness
        .server
        .get("/customers/999")
        .add_header("authorization", harness.staff_auth_header())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn history_requires_view_history_permission() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let customer_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    // Plain authentication is not enough.
    harness
        .server
        .get(&format!("/customers/{customer_id}/history"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_forbidden();

    // The dedicated permission grants access.
    let token = TestHarness::token_for(harness.test_user_id, false, &["view_history"]);
    let response = harness
        .server
        .get(&format!("/customers/{customer_id}/history"))
        .add_header("authorization", token)
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["orders"]
            .as_array()
            .unwrap()
            .len(),
        0
    );
}

#[tokio::test]
async fn history_lists_customer_orders() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;
    harness.add_cart_item(&cart_id, product_id, 1).await;
    let order_id = harness.place_order(&cart_id).await;

    let response = harness
        .server
        .get("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let customer_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    // Staff carry every permission implicitly.
    let response = harness
        .server
        .get(&format!("/customers/{customer_id}/history"))
        .add_header("authorization", harness.staff_auth_header())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id);
}

#[tokio::test]
async fn delete_customer_with_orders_is_blocked() {
    let harness = TestHarness::new().await;
    let product_id = harness.create_product("Beans", 1000).await;
    let cart_id = harness.create_cart().await;
    harness.add_cart_item(&cart_id, product_id, 1).await;
    harness.place_order(&cart_id).await;

    let response = harness
        .server
        .get("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let customer_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    let response = harness
        .server
        .delete(&format!("/customers/{customer_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["Error"],
        "Customer cannot be deleted because they have placed one or more orders."
    );

    // The profile survives the attempt.
    harness
        .server
        .get(&format!("/customers/{customer_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn delete_own_profile() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/customers/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let customer_id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    harness
        .server
        .delete(&format!("/customers/{customer_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    harness
        .server
        .get(&format!("/customers/{customer_id}"))
        .add_header("authorization", harness.staff_auth_header())
        .await
        .assert_status_not_found();
}
