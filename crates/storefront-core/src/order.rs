//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Database id.
    pub id: i64,

    /// The customer who placed the order.
    pub customer_id: i64,

    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

/// A line item on a placed order.
///
/// The unit price is captured at placement time so later product price
/// changes do not rewrite order history. Existence of an order item blocks
/// deletion of the referenced product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Database id.
    pub id: i64,

    /// The owning order.
    pub order_id: i64,

    /// The ordered product.
    pub product_id: i64,

    /// How many units were ordered.
    pub quantity: i64,

    /// Unit price in cents at the time the order was placed.
    pub unit_price_cents: i64,
}

impl OrderItem {
    /// Total price for this line in cents.
    #[must_use]
    pub const fn total_cents(&self) -> i64 {
        self.quantity * self.unit_price_cents
    }
}
