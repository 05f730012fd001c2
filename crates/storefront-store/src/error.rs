//! Error types for storefront storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Record not found.
    #[error("{entity} not found")]
    NotFound {
        /// The entity kind that was missing.
        entity: &'static str,
    },

    /// An order was requested from a cart with no items.
    #[error("cart is empty: {cart_id}")]
    EmptyCart {
        /// The cart that had no items.
        cart_id: String,
    },
}

impl StoreError {
    /// Shorthand for a missing record of the given entity kind.
    #[must_use]
    pub const fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
