//! Catalog types: products, collections, and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Lowest rating a review may carry.
pub const MIN_RATING: i64 = 1;

/// Highest rating a review may carry.
pub const MAX_RATING: i64 = 5;

/// A sellable product.
///
/// Prices are integer cents (`i64`) to avoid floating point precision issues:
/// a product priced at $19.99 stores `1999`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Database id.
    pub id: i64,

    /// Display title.
    pub title: String,

    /// Longer description, if any.
    pub description: Option<String>,

    /// Unit price in cents. Never negative.
    pub unit_price_cents: i64,

    /// The collection this product belongs to, if any.
    pub collection_id: Option<i64>,

    /// When the product was last modified.
    pub last_update: DateTime<Utc>,
}

/// A named grouping of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Database id.
    pub id: i64,

    /// Display title.
    pub title: String,

    /// Number of products currently referencing this collection.
    ///
    /// Derived at query time, never stored.
    pub products_count: i64,
}

/// A customer review attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Database id.
    pub id: i64,

    /// The product this review belongs to.
    pub product_id: i64,

    /// Reviewer display name.
    pub name: String,

    /// Review body.
    pub text: String,

    /// Optional star rating, 1 through 5.
    pub rating: Option<i64>,
}
