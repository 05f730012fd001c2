//! Common test utilities for storefront integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use tempfile::TempDir;

use storefront_core::UserId;
use storefront_service::{create_router, AppState, Claims, ServiceConfig};
use storefront_store::SqliteStore;

const TEST_SECRET: &str = "test-secret";
const TEST_ISSUER: &str = "https://auth.test";
const TEST_AUDIENCE: &str = "storefront";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("storefront.db");
        let store = SqliteStore::open(&db_path)
            .await
            .expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_path: db_path.to_string_lossy().to_string(),
            auth_secret: TEST_SECRET.into(),
            auth_issuer: TEST_ISSUER.into(),
            auth_audience: TEST_AUDIENCE.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            default_page_size: 10,
            max_page_size: 100,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            _temp_dir: temp_dir,
            test_user_id,
        }
    }

    /// Sign a bearer token for an arbitrary identity.
    pub fn token_for(user_id: UserId, staff: bool, perms: &[&str]) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            staff,
            perms: perms.iter().map(ToString::to_string).collect(),
            aud: TEST_AUDIENCE.into(),
            iss: TEST_ISSUER.into(),
            exp: now + 3600,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to sign test token");

        format!("Bearer {token}")
    }

    /// Authorization header for the harness's default (non-staff) user.
    pub fn user_auth_header(&self) -> String {
        Self::token_for(self.test_user_id, false, &[])
    }

    /// Authorization header for a staff user.
    pub fn staff_auth_header(&self) -> String {
        Self::token_for(UserId::generate(), true, &[])
    }

    /// Authorization header for a different non-staff user (isolation tests).
    pub fn other_user_auth_header() -> String {
        Self::token_for(UserId::generate(), false, &[])
    }

    /// Create a product through the API. Returns its id.
    pub async fn create_product(&self, title: &str, unit_price_cents: i64) -> i64 {
        let response = self
            .server
            .post("/products")
            .add_header("authorization", self.staff_auth_header())
            .json(&json!({ "title": title, "unit_price_cents": unit_price_cents }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["id"].as_i64().expect("product id")
    }

    /// Create a collection through the API. Returns its id.
    pub async fn create_collection(&self, title: &str) -> i64 {
        let response = self
            .server
            .post("/collections")
            .add_header("authorization", self.staff_auth_header())
            .json(&json!({ "title": title }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["id"].as_i64().expect("collection id")
    }

    /// Create an anonymous cart. Returns its token.
    pub async fn create_cart(&self) -> String {
        let response = self.server.post("/carts").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["id"].as_str().expect("cart id").to_string()
    }

    /// Add a product to a cart.
    pub async fn add_cart_item(&self, cart_id: &str, product_id: i64, quantity: i64) {
        self.server
            .post(&format!("/carts/{cart_id}/items"))
            .json(&json!({ "product_id": product_id, "quantity": quantity }))
            .await
            .assert_status_ok();
    }

    /// Place an order from a cart as the harness's default user. Returns
    /// the order id.
    pub async fn place_order(&self, cart_id: &str) -> i64 {
        let response = self
            .server
            .post("/orders")
            .add_header("authorization", self.user_auth_header())
            .json(&json!({ "cart_id": cart_id }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["id"].as_i64().expect("order id")
    }
}
