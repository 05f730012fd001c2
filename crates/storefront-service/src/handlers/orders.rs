//! Order handlers.
//!
//! Orders are placed by converting a cart: the cart's items become order
//! items with the product's current price captured, and the cart is
//! consumed. Listing and retrieval are scoped - staff see everything,
//! everyone else only their own customer's orders.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use storefront_core::{CartId, Order, OrderItem};
use storefront_store::{OrderScope, Store, StoreError};

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::extract::Path;
use crate::state::AppState;

/// Order summary (no line items).
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    /// Order id.
    pub id: i64,
    /// The customer who placed the order.
    pub customer_id: i64,
    /// Placement timestamp.
    pub placed_at: String,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            placed_at: order.placed_at.to_rfc3339(),
        }
    }
}

/// Order line item response.
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    /// Item id.
    pub id: i64,
    /// The ordered product.
    pub product_id: i64,
    /// Units ordered.
    pub quantity: i64,
    /// Unit price in cents captured at placement.
    pub unit_price_cents: i64,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
        }
    }
}

/// Full order response with line items.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// Order id.
    pub id: i64,
    /// The customer who placed the order.
    pub customer_id: i64,
    /// Placement timestamp.
    pub placed_at: String,
    /// The order's line items.
    pub items: Vec<OrderItemResponse>,
    /// Sum of quantity times captured unit price, in cents.
    pub total_cents: i64,
}

impl OrderResponse {
    fn assemble(order: &Order, items: &[OrderItem]) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            placed_at: order.placed_at.to_rfc3339(),
            items: items.iter().map(OrderItemResponse::from).collect(),
            total_cents: items.iter().map(OrderItem::total_cents).sum(),
        }
    }
}

/// Order listing response.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    /// The visible orders, newest first.
    pub orders: Vec<OrderSummary>,
}

/// Place-order request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// The cart to convert into an order.
    pub cart_id: CartId,
}

/// Reassignment request body. Admin only.
#[derive(Debug, Deserialize)]
pub struct OrderUpdateRequest {
    /// The customer the order should belong to.
    pub customer_id: i64,
}

/// List orders. Staff see all; everyone else only their own.
pub async fn list(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<OrderListResponse>, ApiError> {
    let scope = if auth.staff {
        OrderScope::All
    } else {
        let customer = state.store.get_or_create_customer(&auth.user_id).await?;
        OrderScope::ByCustomer(customer.id)
    };

    let orders = state.store.list_orders(scope).await?;

    Ok(Json(OrderListResponse {
        orders: orders.iter().map(OrderSummary::from).collect(),
    }))
}

/// Place an order by converting the given cart.
pub async fn create(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let customer = state.store.get_or_create_customer(&auth.user_id).await?;

    let (order, items) = match state
        .store
        .create_order_from_cart(customer.id, &body.cart_id)
        .await
    {
        Ok(placed) => placed,
        Err(StoreError::NotFound { entity: "cart" }) => {
            return Err(ApiError::validation("cart_id", "No cart with this id."));
        }
        Err(StoreError::EmptyCart { .. }) => {
            return Err(ApiError::validation("cart_id", "The cart is empty."));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(OrderResponse::assemble(&order, &items)))
}

/// Get one order. Staff see any; everyone else only their own (others 404
/// as out of scope).
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .store
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("order not found".into()))?;

    if !auth.staff {
        let customer = state.store.get_or_create_customer(&auth.user_id).await?;
        if order.customer_id != customer.id {
            return Err(ApiError::NotFound("order not found".into()));
        }
    }

    let items = state.store.list_order_items(order.id).await?;

    Ok(Json(OrderResponse::assemble(&order, &items)))
}

/// Reassign an order to another customer. Admin only. PUT and PATCH share
/// this handler since the owning customer is the only mutable field.
pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<OrderUpdateRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    if state.store.get_customer(body.customer_id).await?.is_none() {
        return Err(ApiError::validation(
            "customer_id",
            "No customer with this id.",
        ));
    }

    let order = state.store.set_order_customer(id, body.customer_id).await?;
    let items = state.store.list_order_items(order.id).await?;

    tracing::info!(order_id = id, customer_id = body.customer_id, "order reassigned");

    Ok(Json(OrderResponse::assemble(&order, &items)))
}

/// Delete an order and its items. Admin only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete_order(id).await?;

    tracing::info!(order_id = id, user_id = %admin.0.user_id, "order deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
