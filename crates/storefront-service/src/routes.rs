//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{carts, collections, customers, health, orders, products, reviews};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /products`, `GET /products/:id` - Catalog reads (plus nested
///   reviews and collections); writes are staff-only
/// - `POST /carts`, `GET/DELETE /carts/:id`, cart item routes - the cart
///   token is the capability
///
/// ## Authenticated (bearer JWT)
/// - `GET/PUT /customers/me` - Self-service profile (get-or-create)
/// - `GET/PUT/PATCH/DELETE /customers/:id` - Owner or staff
/// - `GET /customers/:id/history` - Requires the `view_history` permission
/// - `GET/POST /orders`, `GET /orders/:id` - Scoped to the caller's
///   customer unless staff; mutation is staff-only
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Reviews are nested under their parent product.
    let review_routes = Router::new()
        .route("/", get(reviews::list).post(reviews::create))
        .route(
            "/:id",
            get(reviews::retrieve)
                .put(reviews::update)
                .patch(reviews::patch)
                .delete(reviews::destroy),
        );

    // Cart items accept a restricted verb set: PUT is rejected explicitly.
    let cart_item_routes = Router::new()
        .route("/", get(carts::list_items).post(carts::create_item))
        .route(
            "/:id",
            get(carts::retrieve_item)
                .patch(carts::patch_item)
                .delete(carts::delete_item)
                .put(carts::replace_item_not_allowed),
        );

    let api_routes = Router::new()
        // Catalog
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:product_id",
            get(products::retrieve)
                .put(products::update)
                .patch(products::patch)
                .delete(products::destroy),
        )
        .nest("/products/:product_id/reviews", review_routes)
        .route(
            "/collections",
            get(collections::list).post(collections::create),
        )
        .route(
            "/collections/:id",
            get(collections::retrieve)
                .put(collections::update)
                .patch(collections::update)
                .delete(collections::destroy),
        )
        // Carts
        .route("/carts", post(carts::create))
        .route("/carts/:cart_id", get(carts::retrieve).delete(carts::destroy))
        .nest("/carts/:cart_id/items", cart_item_routes)
        // Customers
        .route("/customers/me", get(customers::me).put(customers::update_me))
        .route(
            "/customers/:id",
            get(customers::retrieve)
                .put(customers::update)
                .patch(customers::update)
                .delete(customers::destroy),
        )
        .route("/customers/:id/history", get(customers::history))
        // Orders
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/:id",
            get(orders::retrieve)
                .put(orders::update)
                .patch(orders::update)
                .delete(orders::destroy),
        )
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no limits)
        .route("/health", get(health::health))
        .merge(api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
