//! Anonymous shopping carts and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CartId;

/// An anonymous shopping cart.
///
/// Carts have no owner; the opaque `CartId` token is the only handle to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Opaque cart token.
    pub id: CartId,

    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

/// A line item in a cart.
///
/// At most one item exists per (cart, product) pair; adding the same product
/// again merges into the existing row by incrementing `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Database id.
    pub id: i64,

    /// The owning cart.
    pub cart_id: CartId,

    /// The product in the cart.
    pub product_id: i64,

    /// How many units. Always >= 1.
    pub quantity: i64,
}
