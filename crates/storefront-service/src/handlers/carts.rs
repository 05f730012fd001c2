//! Anonymous cart and cart item handlers.
//!
//! Carts need no authentication: the opaque cart token is the capability.
//! Cart items accept a restricted verb set - create, read, partial-update
//! of quantity, delete. Full replacement (PUT) is rejected.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use storefront_core::{Cart, CartId, CartItem};
use storefront_store::Store;

use crate::error::ApiError;
use crate::extract::Path;
use crate::state::AppState;

/// Cart line item response.
#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    /// Item id.
    pub id: i64,
    /// The product in the cart.
    pub product_id: i64,
    /// Units of the product.
    pub quantity: i64,
}

impl From<&CartItem> for CartItemResponse {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

/// Cart response with items and a computed total.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    /// Opaque cart token.
    pub id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// The cart's line items.
    pub items: Vec<CartItemResponse>,
    /// Sum of quantity times current unit price over all items, in cents.
    pub total_cents: i64,
}

impl CartResponse {
    fn assemble(cart: &Cart, items: &[CartItem], total_cents: i64) -> Self {
        Self {
            id: cart.id.to_string(),
            created_at: cart.created_at.to_rfc3339(),
            items: items.iter().map(CartItemResponse::from).collect(),
            total_cents,
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    /// The product to add.
    pub product_id: i64,
    /// How many units to add.
    pub quantity: i64,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct CartItemPatchRequest {
    /// The new quantity.
    pub quantity: i64,
}

fn validate_quantity(quantity: i64) -> Result<(), ApiError> {
    if quantity < 1 {
        return Err(ApiError::validation(
            "quantity",
            "Ensure this value is greater than or equal to 1.",
        ));
    }
    Ok(())
}

/// 404 unless the cart exists.
async fn ensure_cart(state: &AppState, cart_id: &CartId) -> Result<Cart, ApiError> {
    state
        .store
        .get_cart(cart_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("cart not found".into()))
}

/// Create a new empty cart.
pub async fn create(State(state): State<Arc<AppState>>) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.store.create_cart().await?;

    tracing::info!(cart_id = %cart.id, "cart created");

    Ok(Json(CartResponse::assemble(&cart, &[], 0)))
}

/// Get a cart with its items and total.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<CartId>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = ensure_cart(&state, &cart_id).await?;
    let items = state.store.list_cart_items(&cart_id).await?;
    let total_cents = state.store.cart_total_cents(&cart_id).await?;

    Ok(Json(CartResponse::assemble(&cart, &items, total_cents)))
}

/// Delete a cart and its items.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<CartId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete_cart(&cart_id).await?;

    tracing::info!(cart_id = %cart_id, "cart deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// List a cart's items.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<CartId>,
) -> Result<Json<Vec<CartItemResponse>>, ApiError> {
    ensure_cart(&state, &cart_id).await?;
    let items = state.store.list_cart_items(&cart_id).await?;

    Ok(Json(items.iter().map(CartItemResponse::from).collect()))
}

/// Add a product to a cart.
///
/// Adding a product that is already in the cart merges into the existing
/// line by incrementing its quantity.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<CartId>,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<CartItemResponse>, ApiError> {
    ensure_cart(&state, &cart_id).await?;
    validate_quantity(body.quantity)?;

    if state.store.get_product(body.product_id).await?.is_none() {
        return Err(ApiError::validation(
            "product_id",
            "No product with this id.",
        ));
    }

    let item = state
        .store
        .upsert_cart_item(&cart_id, body.product_id, body.quantity)
        .await?;

    tracing::info!(
        cart_id = %cart_id,
        product_id = body.product_id,
        quantity = item.quantity,
        "cart item added"
    );

    Ok(Json(CartItemResponse::from(&item)))
}

/// Get one cart item.
pub async fn retrieve_item(
    State(state): State<Arc<AppState>>,
    Path((cart_id, id)): Path<(CartId, i64)>,
) -> Result<Json<CartItemResponse>, ApiError> {
    ensure_cart(&state, &cart_id).await?;

    let item = state
        .store
        .get_cart_item(&cart_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("cart item not found".into()))?;

    Ok(Json(CartItemResponse::from(&item)))
}

/// Update a cart item's quantity.
pub async fn patch_item(
    State(state): State<Arc<AppState>>,
    Path((cart_id, id)): Path<(CartId, i64)>,
    Json(body): Json<CartItemPatchRequest>,
) -> Result<Json<CartItemResponse>, ApiError> {
    ensure_cart(&state, &cart_id).await?;
    validate_quantity(body.quantity)?;

    let item = state
        .store
        .set_cart_item_quantity(&cart_id, id, body.quantity)
        .await?;

    Ok(Json(CartItemResponse::from(&item)))
}

/// Remove an item from a cart.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path((cart_id, id)): Path<(CartId, i64)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    ensure_cart(&state, &cart_id).await?;
    state.store.delete_cart_item(&cart_id, id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Cart items cannot be fully replaced; only quantity updates via PATCH.
pub async fn replace_item_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
