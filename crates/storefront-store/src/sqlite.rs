//! SQLite storage implementation.
//!
//! This module provides the `SqliteStore` implementation of the `Store`
//! trait. SQLite runs with WAL journaling, foreign keys ON, and a single
//! pooled connection, which sidesteps `database is locked` errors under
//! concurrent handler access while leaving conflict resolution to the
//! engine's constraints.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, QueryBuilder, Row, Sqlite};

use storefront_core::{
    Cart, CartId, CartItem, Collection, Customer, Order, OrderItem, Product, Review, UserId,
};

use crate::error::{Result, StoreError};
use crate::schema::BOOTSTRAP_SQL;
use crate::{
    CustomerUpdate, OrderScope, ProductFilter, ProductOrdering, ProductPage, ProductInput,
    ReviewInput, Store,
};

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage implementation.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    ///
    /// The bootstrap schema is applied on every open; all statements are
    /// idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be applied.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(&format!(
            "sqlite:{}?mode=rwc",
            path.as_ref().display()
        ))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

        Self::connect(opts).await
    }

    /// Open a fresh in-memory database (used by tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be applied.
    pub async fn open_in_memory() -> Result<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        Self::connect(opts).await
    }

    async fn connect(opts: SqliteConnectOptions) -> Result<Self> {
        // SQLite permits limited write concurrency; a single pooled connection
        // serializes statements and keeps the in-memory variant coherent.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        sqlx::raw_sql(BOOTSTRAP_SQL).execute(&pool).await?;
        tracing::debug!("schema bootstrap applied");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn product_from_row(row: &SqliteRow) -> Result<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        unit_price_cents: row.try_get("unit_price_cents")?,
        collection_id: row.try_get("collection_id")?,
        last_update: row.try_get("last_update")?,
    })
}

fn collection_from_row(row: &SqliteRow) -> Result<Collection> {
    Ok(Collection {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        products_count: row.try_get("products_count")?,
    })
}

fn review_from_row(row: &SqliteRow) -> Result<Review> {
    Ok(Review {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        name: row.try_get("name")?,
        text: row.try_get("text")?,
        rating: row.try_get("rating")?,
    })
}

fn cart_item_from_row(row: &SqliteRow) -> Result<CartItem> {
    Ok(CartItem {
        id: row.try_get("id")?,
        cart_id: parse_cart_id(&row.try_get::<String, _>("cart_id")?)?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
    })
}

fn customer_from_row(row: &SqliteRow) -> Result<Customer> {
    let raw: String = row.try_get("user_id")?;
    let user_id = raw
        .parse::<UserId>()
        .map_err(|_| StoreError::Database(format!("corrupt user id in customers row: {raw}")))?;

    Ok(Customer {
        id: row.try_get("id")?,
        user_id,
        phone: row.try_get("phone")?,
        birth_date: row.try_get("birth_date")?,
    })
}

fn order_from_row(row: &SqliteRow) -> Result<Order> {
    Ok(Order {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        placed_at: row.try_get("placed_at")?,
    })
}

fn order_item_from_row(row: &SqliteRow) -> Result<OrderItem> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        unit_price_cents: row.try_get("unit_price_cents")?,
    })
}

fn parse_cart_id(raw: &str) -> Result<CartId> {
    raw.parse::<CartId>()
        .map_err(|_| StoreError::Database(format!("corrupt cart id in row: {raw}")))
}

/// Append the WHERE clause for a product filter to a query builder.
fn push_product_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &ProductFilter) {
    let mut sep = " WHERE ";

    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(sep)
            .push("(title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
        sep = " AND ";
    }
    if let Some(collection_id) = filter.collection_id {
        qb.push(sep)
            .push("collection_id = ")
            .push_bind(collection_id);
        sep = " AND ";
    }
    if let Some(min) = filter.price_min_cents {
        qb.push(sep).push("unit_price_cents >= ").push_bind(min);
        sep = " AND ";
    }
    if let Some(max) = filter.price_max_cents {
        qb.push(sep).push("unit_price_cents <= ").push_bind(max);
    }
}

const fn ordering_sql(ordering: Option<ProductOrdering>) -> &'static str {
    match ordering {
        Some(ProductOrdering::UnitPriceAsc) => " ORDER BY unit_price_cents ASC, id ASC",
        Some(ProductOrdering::UnitPriceDesc) => " ORDER BY unit_price_cents DESC, id ASC",
        Some(ProductOrdering::LastUpdateAsc) => " ORDER BY last_update ASC, id ASC",
        Some(ProductOrdering::LastUpdateDesc) => " ORDER BY last_update DESC, id ASC",
        None => " ORDER BY id ASC",
    }
}

#[async_trait]
impl Store for SqliteStore {
    // =========================================================================
    // Product Operations
    // =========================================================================

    async fn insert_product(&self, input: &ProductInput) -> Result<Product> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO products (title, description, unit_price_cents, collection_id, last_update) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, title, description, unit_price_cents, collection_id, last_update",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.unit_price_cents)
        .bind(input.collection_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        product_from_row(&row)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        sqlx::query(
            "SELECT id, title, description, unit_price_cents, collection_id, last_update \
             FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| product_from_row(&row))
        .transpose()
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        push_product_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build()
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?;

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, title, description, unit_price_cents, collection_id, last_update \
             FROM products",
        );
        push_product_filters(&mut qb, filter);
        qb.push(ordering_sql(filter.ordering));
        qb.push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let items = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(ProductPage { items, total })
    }

    async fn update_product(&self, id: i64, input: &ProductInput) -> Result<Product> {
        let now = Utc::now();
        let row = sqlx::query(
            "UPDATE products \
             SET title = ?, description = ?, unit_price_cents = ?, collection_id = ?, last_update = ? \
             WHERE id = ? \
             RETURNING id, title, description, unit_price_cents, collection_id, last_update",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.unit_price_cents)
        .bind(input.collection_id)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("product"))?;

        product_from_row(&row)
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product"));
        }
        Ok(())
    }

    async fn count_order_items_for_product(&self, product_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) FROM order_items WHERE product_id = ?")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get(0)?)
    }

    // =========================================================================
    // Collection Operations
    // =========================================================================

    async fn insert_collection(&self, title: &str) -> Result<Collection> {
        let row = sqlx::query("INSERT INTO collections (title) VALUES (?) RETURNING id, title")
            .bind(title)
            .fetch_one(&self.pool)
            .await?;

        Ok(Collection {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            products_count: 0,
        })
    }

    async fn get_collection(&self, id: i64) -> Result<Option<Collection>> {
        sqlx::query(
            "SELECT c.id, c.title, COUNT(p.id) AS products_count \
             FROM collections c LEFT JOIN products p ON p.collection_id = c.id \
             WHERE c.id = ? \
             GROUP BY c.id, c.title",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| collection_from_row(&row))
        .transpose()
    }

    async fn list_collections(&self, search: Option<&str>) -> Result<Vec<Collection>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT c.id, c.title, COUNT(p.id) AS products_count \
             FROM collections c LEFT JOIN products p ON p.collection_id = c.id",
        );
        if let Some(search) = search {
            qb.push(" WHERE c.title LIKE ")
                .push_bind(format!("%{search}%"));
        }
        qb.push(" GROUP BY c.id, c.title ORDER BY c.id ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(collection_from_row).collect()
    }

    async fn update_collection(&self, id: i64, title: &str) -> Result<Collection> {
        let result = sqlx::query("UPDATE collections SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("collection"));
        }

        self.get_collection(id)
            .await?
            .ok_or(StoreError::not_found("collection"))
    }

    async fn delete_collection(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM collections WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("collection"));
        }
        Ok(())
    }

    async fn count_products_in_collection(&self, collection_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) FROM products WHERE collection_id = ?")
            .bind(collection_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get(0)?)
    }

    // =========================================================================
    // Review Operations
    // =========================================================================

    async fn insert_review(&self, product_id: i64, input: &ReviewInput) -> Result<Review> {
        let row = sqlx::query(
            "INSERT INTO reviews (product_id, name, text, rating) VALUES (?, ?, ?, ?) \
             RETURNING id, product_id, name, text, rating",
        )
        .bind(product_id)
        .bind(&input.name)
        .bind(&input.text)
        .bind(input.rating)
        .fetch_one(&self.pool)
        .await?;

        review_from_row(&row)
    }

    async fn get_review(&self, product_id: i64, id: i64) -> Result<Option<Review>> {
        sqlx::query(
            "SELECT id, product_id, name, text, rating FROM reviews \
             WHERE id = ? AND product_id = ?",
        )
        .bind(id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| review_from_row(&row))
        .transpose()
    }

    async fn list_reviews(&self, product_id: i64, search: Option<&str>) -> Result<Vec<Review>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, product_id, name, text, rating FROM reviews WHERE product_id = ",
        );
        qb.push_bind(product_id);
        if let Some(search) = search {
            qb.push(" AND text LIKE ").push_bind(format!("%{search}%"));
        }
        qb.push(" ORDER BY id ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(review_from_row).collect()
    }

    async fn update_review(&self, product_id: i64, id: i64, input: &ReviewInput) -> Result<Review> {
        let row = sqlx::query(
            "UPDATE reviews SET name = ?, text = ?, rating = ? \
             WHERE id = ? AND product_id = ? \
             RETURNING id, product_id, name, text, rating",
        )
        .bind(&input.name)
        .bind(&input.text)
        .bind(input.rating)
        .bind(id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("review"))?;

        review_from_row(&row)
    }

    async fn delete_review(&self, product_id: i64, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ? AND product_id = ?")
            .bind(id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("review"));
        }
        Ok(())
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    async fn create_cart(&self) -> Result<Cart> {
        let cart = Cart {
            id: CartId::generate(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO carts (id, created_at) VALUES (?, ?)")
            .bind(cart.id.to_string())
            .bind(cart.created_at)
            .execute(&self.pool)
            .await?;

        Ok(cart)
    }

    async fn get_cart(&self, id: &CartId) -> Result<Option<Cart>> {
        let row = sqlx::query("SELECT id, created_at FROM carts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Cart {
                id: parse_cart_id(&row.try_get::<String, _>("id")?)?,
                created_at: row.try_get("created_at")?,
            })
        })
        .transpose()
    }

    async fn delete_cart(&self, id: &CartId) -> Result<()> {
        let result = sqlx::query("DELETE FROM carts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("cart"));
        }
        Ok(())
    }

    async fn list_cart_items(&self, cart_id: &CartId) -> Result<Vec<CartItem>> {
        let rows = sqlx::query(
            "SELECT id, cart_id, product_id, quantity FROM cart_items \
             WHERE cart_id = ? ORDER BY id ASC",
        )
        .bind(cart_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(cart_item_from_row).collect()
    }

    async fn get_cart_item(&self, cart_id: &CartId, id: i64) -> Result<Option<CartItem>> {
        sqlx::query(
            "SELECT id, cart_id, product_id, quantity FROM cart_items \
             WHERE id = ? AND cart_id = ?",
        )
        .bind(id)
        .bind(cart_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .map(|row| cart_item_from_row(&row))
        .transpose()
    }

    async fn upsert_cart_item(
        &self,
        cart_id: &CartId,
        product_id: i64,
        quantity: i64,
    ) -> Result<CartItem> {
        // The unique constraint turns a duplicate add into a quantity merge,
        // so concurrent adds of the same product never produce two rows.
        let row = sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES (?, ?, ?) \
             ON CONFLICT(cart_id, product_id) \
             DO UPDATE SET quantity = quantity + excluded.quantity \
             RETURNING id, cart_id, product_id, quantity",
        )
        .bind(cart_id.to_string())
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        cart_item_from_row(&row)
    }

    async fn set_cart_item_quantity(
        &self,
        cart_id: &CartId,
        id: i64,
        quantity: i64,
    ) -> Result<CartItem> {
        let row = sqlx::query(
            "UPDATE cart_items SET quantity = ? WHERE id = ? AND cart_id = ? \
             RETURNING id, cart_id, product_id, quantity",
        )
        .bind(quantity)
        .bind(id)
        .bind(cart_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("cart item"))?;

        cart_item_from_row(&row)
    }

    async fn delete_cart_item(&self, cart_id: &CartId, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND cart_id = ?")
            .bind(id)
            .bind(cart_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("cart item"));
        }
        Ok(())
    }

    async fn cart_total_cents(&self, cart_id: &CartId) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(ci.quantity * p.unit_price_cents), 0) \
             FROM cart_items ci JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = ?",
        )
        .bind(cart_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get(0)?)
    }

    // =========================================================================
    // Customer Operations
    // =========================================================================

    async fn get_or_create_customer(&self, user_id: &UserId) -> Result<Customer> {
        sqlx::query("INSERT INTO customers (user_id) VALUES (?) ON CONFLICT(user_id) DO NOTHING")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        let row = sqlx::query(
            "SELECT id, user_id, phone, birth_date FROM customers WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        customer_from_row(&row)
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
        sqlx::query("SELECT id, user_id, phone, birth_date FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| customer_from_row(&row))
            .transpose()
    }

    async fn update_customer(&self, id: i64, update: &CustomerUpdate) -> Result<Customer> {
        let row = sqlx::query(
            "UPDATE customers \
             SET phone = COALESCE(?, phone), birth_date = COALESCE(?, birth_date) \
             WHERE id = ? \
             RETURNING id, user_id, phone, birth_date",
        )
        .bind(&update.phone)
        .bind(&update.birth_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("customer"))?;

        customer_from_row(&row)
    }

    async fn delete_customer(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("customer"));
        }
        Ok(())
    }

    async fn count_orders_for_customer(&self, customer_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) FROM orders WHERE customer_id = ?")
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get(0)?)
    }

    // =========================================================================
    // Order Operations
    // =========================================================================

    async fn create_order_from_cart(
        &self,
        customer_id: i64,
        cart_id: &CartId,
    ) -> Result<(Order, Vec<OrderItem>)> {
        let mut tx = self.pool.begin().await?;

        let cart_exists = sqlx::query("SELECT 1 FROM carts WHERE id = ?")
            .bind(cart_id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !cart_exists {
            return Err(StoreError::not_found("cart"));
        }

        let item_count: i64 = sqlx::query("SELECT COUNT(*) FROM cart_items WHERE cart_id = ?")
            .bind(cart_id.to_string())
            .fetch_one(&mut *tx)
            .await?
            .try_get(0)?;
        if item_count == 0 {
            return Err(StoreError::EmptyCart {
                cart_id: cart_id.to_string(),
            });
        }

        let placed_at = Utc::now();
        let order_row = sqlx::query(
            "INSERT INTO orders (customer_id, placed_at) VALUES (?, ?) \
             RETURNING id, customer_id, placed_at",
        )
        .bind(customer_id)
        .bind(placed_at)
        .fetch_one(&mut *tx)
        .await?;
        let order = order_from_row(&order_row)?;

        // Capture each product's current price on the order line.
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents) \
             SELECT ?, ci.product_id, ci.quantity, p.unit_price_cents \
             FROM cart_items ci JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = ?",
        )
        .bind(order.id)
        .bind(cart_id.to_string())
        .execute(&mut *tx)
        .await?;

        // The cart is consumed by the conversion; cascade removes its items.
        sqlx::query("DELETE FROM carts WHERE id = ?")
            .bind(cart_id.to_string())
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query(
            "SELECT id, order_id, product_id, quantity, unit_price_cents \
             FROM order_items WHERE order_id = ? ORDER BY id ASC",
        )
        .bind(order.id)
        .fetch_all(&mut *tx)
        .await?;
        let items = rows
            .iter()
            .map(order_item_from_row)
            .collect::<Result<Vec<_>>>()?;

        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            customer_id,
            cart_id = %cart_id,
            items = items.len(),
            "order placed from cart"
        );

        Ok((order, items))
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>> {
        sqlx::query("SELECT id, customer_id, placed_at FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| order_from_row(&row))
            .transpose()
    }

    async fn list_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query(
            "SELECT id, order_id, product_id, quantity, unit_price_cents \
             FROM order_items WHERE order_id = ? ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_item_from_row).collect()
    }

    async fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>> {
        let rows = match scope {
            OrderScope::All => {
                sqlx::query(
                    "SELECT id, customer_id, placed_at FROM orders ORDER BY placed_at DESC, id DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            OrderScope::ByCustomer(customer_id) => {
                sqlx::query(
                    "SELECT id, customer_id, placed_at FROM orders \
                     WHERE customer_id = ? ORDER BY placed_at DESC, id DESC",
                )
                .bind(customer_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(order_from_row).collect()
    }

    async fn set_order_customer(&self, id: i64, customer_id: i64) -> Result<Order> {
        let row = sqlx::query(
            "UPDATE orders SET customer_id = ? WHERE id = ? \
             RETURNING id, customer_id, placed_at",
        )
        .bind(customer_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("order"))?;

        order_from_row(&row)
    }

    async fn delete_order(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("order"));
        }
        Ok(())
    }
}
