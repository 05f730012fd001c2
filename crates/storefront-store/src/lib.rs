//! SQLite storage layer for the storefront service.
//!
//! This crate provides persistent storage for the catalog (products,
//! collections, reviews), anonymous carts, customer profiles, and orders,
//! backed by SQLite through `sqlx`.
//!
//! # Architecture
//!
//! All relational integrity the service relies on is enforced here by the
//! schema rather than by application-level locking:
//!
//! - `customers.user_id` is UNIQUE, making [`Store::get_or_create_customer`]
//!   idempotent under concurrent first access,
//! - `cart_items (cart_id, product_id)` is UNIQUE, backing the
//!   quantity-merge semantics of [`Store::upsert_cart_item`],
//! - foreign keys are ON, so scoped lookups and cascades behave.
//!
//! Reference counts consumed by the service's deletion guards
//! ([`Store::count_order_items_for_product`],
//! [`Store::count_products_in_collection`]) are live queries, never cached.
//!
//! # Example
//!
//! ```no_run
//! use storefront_store::{SqliteStore, Store, ProductInput};
//!
//! # async fn demo() -> storefront_store::Result<()> {
//! let store = SqliteStore::open("/tmp/storefront.db").await?;
//!
//! let product = store
//!     .insert_product(&ProductInput {
//!         title: "Espresso beans".into(),
//!         description: None,
//!         unit_price_cents: 1499,
//!         collection_id: None,
//!     })
//!     .await?;
//!
//! assert!(store.get_product(product.id).await?.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod schema;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use storefront_core::{
    Cart, CartId, CartItem, Collection, Customer, Order, OrderItem, Product, Review, UserId,
};

// ============================================================================
// Query and input types
// ============================================================================

/// Fields for creating or fully replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Display title.
    pub title: String,
    /// Longer description, if any.
    pub description: Option<String>,
    /// Unit price in cents.
    pub unit_price_cents: i64,
    /// Owning collection, if any.
    pub collection_id: Option<i64>,
}

/// Fields for creating or fully replacing a review.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    /// Reviewer display name.
    pub name: String,
    /// Review body.
    pub text: String,
    /// Optional star rating.
    pub rating: Option<i64>,
}

/// Partial update of a customer profile.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    /// New phone number.
    pub phone: Option<String>,
    /// New date of birth (ISO date string).
    pub birth_date: Option<String>,
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrdering {
    /// Cheapest first.
    UnitPriceAsc,
    /// Most expensive first.
    UnitPriceDesc,
    /// Least recently updated first.
    LastUpdateAsc,
    /// Most recently updated first.
    LastUpdateDesc,
}

/// Filter, ordering, and pagination for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Free-text search over title and description.
    pub search: Option<String>,
    /// Restrict to one collection.
    pub collection_id: Option<i64>,
    /// Minimum unit price in cents, inclusive.
    pub price_min_cents: Option<i64>,
    /// Maximum unit price in cents, inclusive.
    pub price_max_cents: Option<i64>,
    /// Sort order. Defaults to id order when absent.
    pub ordering: Option<ProductOrdering>,
    /// Page size.
    pub limit: i64,
    /// Rows to skip.
    pub offset: i64,
}

/// One page of a product listing.
#[derive(Debug, Clone)]
pub struct ProductPage {
    /// The rows on this page.
    pub items: Vec<Product>,
    /// Total number of rows matching the filter across all pages.
    pub total: i64,
}

/// Which orders a listing may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Every order (staff callers).
    All,
    /// Only orders placed by the given customer.
    ByCustomer(i64),
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations and for handlers to be tested against fakes.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Product Operations
    // =========================================================================

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn insert_product(&self, input: &ProductInput) -> Result<Product>;

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_product(&self, id: i64) -> Result<Option<Product>>;

    /// List products with filtering, ordering, and pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage>;

    /// Replace a product's fields, refreshing `last_update`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product doesn't exist.
    async fn update_product(&self, id: i64, input: &ProductInput) -> Result<Product>;

    /// Delete a product.
    ///
    /// The caller is responsible for running the order-item guard first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product doesn't exist.
    async fn delete_product(&self, id: i64) -> Result<()>;

    /// Count order items referencing a product (deletion-guard input).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_order_items_for_product(&self, product_id: i64) -> Result<i64>;

    // =========================================================================
    // Collection Operations
    // =========================================================================

    /// Insert a new collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn insert_collection(&self, title: &str) -> Result<Collection>;

    /// Get a collection by id, with its live `products_count`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_collection(&self, id: i64) -> Result<Option<Collection>>;

    /// List collections, each with its live `products_count`, optionally
    /// filtered by a title search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_collections(&self, search: Option<&str>) -> Result<Vec<Collection>>;

    /// Rename a collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the collection doesn't exist.
    async fn update_collection(&self, id: i64, title: &str) -> Result<Collection>;

    /// Delete a collection.
    ///
    /// The caller is responsible for running the referencing-products guard
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the collection doesn't exist.
    async fn delete_collection(&self, id: i64) -> Result<()>;

    /// Count products referencing a collection (deletion-guard input).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_products_in_collection(&self, collection_id: i64) -> Result<i64>;

    // =========================================================================
    // Review Operations (scoped to a parent product)
    // =========================================================================

    /// Insert a review under a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn insert_review(&self, product_id: i64, input: &ReviewInput) -> Result<Review>;

    /// Get a review by id, scoped to its parent product.
    ///
    /// Returns `None` when the review exists but under a different product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_review(&self, product_id: i64, id: i64) -> Result<Option<Review>>;

    /// List a product's reviews, optionally filtered by a text search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_reviews(&self, product_id: i64, search: Option<&str>) -> Result<Vec<Review>>;

    /// Replace a review's fields, scoped to its parent product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no review matches the (product, id)
    /// pair.
    async fn update_review(&self, product_id: i64, id: i64, input: &ReviewInput) -> Result<Review>;

    /// Delete a review, scoped to its parent product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no review matches the (product, id)
    /// pair.
    async fn delete_review(&self, product_id: i64, id: i64) -> Result<()>;

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Create a new empty cart with a freshly minted token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn create_cart(&self) -> Result<Cart>;

    /// Get a cart by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_cart(&self, id: &CartId) -> Result<Option<Cart>>;

    /// Delete a cart and (by cascade) its items.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the cart doesn't exist.
    async fn delete_cart(&self, id: &CartId) -> Result<()>;

    /// List a cart's items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_cart_items(&self, cart_id: &CartId) -> Result<Vec<CartItem>>;

    /// Get a cart item by id, scoped to its cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_cart_item(&self, cart_id: &CartId, id: i64) -> Result<Option<CartItem>>;

    /// Add a product to a cart, merging into an existing line.
    ///
    /// If the cart already holds the product, the existing row's quantity is
    /// incremented by `quantity` instead of inserting a duplicate. The merge
    /// is resolved by the `(cart_id, product_id)` unique constraint, so
    /// concurrent adds of the same product never produce two rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn upsert_cart_item(
        &self,
        cart_id: &CartId,
        product_id: i64,
        quantity: i64,
    ) -> Result<CartItem>;

    /// Set a cart item's quantity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no item matches the (cart, id) pair.
    async fn set_cart_item_quantity(
        &self,
        cart_id: &CartId,
        id: i64,
        quantity: i64,
    ) -> Result<CartItem>;

    /// Remove an item from a cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no item matches the (cart, id) pair.
    async fn delete_cart_item(&self, cart_id: &CartId, id: i64) -> Result<()>;

    /// Sum of `quantity * unit_price_cents` over a cart's items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn cart_total_cents(&self, cart_id: &CartId) -> Result<i64>;

    // =========================================================================
    // Customer Operations
    // =========================================================================

    /// Get the customer for an identity, creating one on first access.
    ///
    /// Idempotent: concurrent first accesses by the same identity resolve to
    /// a single row via the `user_id` unique constraint.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_or_create_customer(&self, user_id: &UserId) -> Result<Customer>;

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_customer(&self, id: i64) -> Result<Option<Customer>>;

    /// Apply a partial update to a customer profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the customer doesn't exist.
    async fn update_customer(&self, id: i64, update: &CustomerUpdate) -> Result<Customer>;

    /// Delete a customer.
    ///
    /// The caller is responsible for running the referencing-orders guard
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the customer doesn't exist.
    async fn delete_customer(&self, id: i64) -> Result<()>;

    /// Count orders placed by a customer (deletion-guard input).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_orders_for_customer(&self, customer_id: i64) -> Result<i64>;

    // =========================================================================
    // Order Operations
    // =========================================================================

    /// Place an order by converting a cart.
    ///
    /// Copies the cart's items into order items, capturing each product's
    /// current unit price, then deletes the cart. Runs in one transaction.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the cart doesn't exist.
    /// - `StoreError::EmptyCart` if the cart has no items.
    async fn create_order_from_cart(
        &self,
        customer_id: i64,
        cart_id: &CartId,
    ) -> Result<(Order, Vec<OrderItem>)>;

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_order(&self, id: i64) -> Result<Option<Order>>;

    /// List an order's items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>>;

    /// List orders visible under the given scope, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>>;

    /// Reassign an order to another customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order doesn't exist.
    async fn set_order_customer(&self, id: i64, customer_id: i64) -> Result<Order>;

    /// Delete an order and (by cascade) its items.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order doesn't exist.
    async fn delete_order(&self, id: i64) -> Result<()>;
}
