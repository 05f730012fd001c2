//! Product catalog handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use storefront_core::Product;
use storefront_store::{ProductFilter, ProductInput, ProductOrdering, Store};

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::extract::Path;
use crate::state::AppState;

/// Reason returned when a product delete is vetoed by the order-item guard.
pub const PRODUCT_IN_ORDER_REASON: &str =
    "Product cannot be delete because it is associated with another order item.";

/// Product response.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product id.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Longer description, if any.
    pub description: Option<String>,
    /// Unit price in cents.
    pub unit_price_cents: i64,
    /// Owning collection, if any.
    pub collection_id: Option<i64>,
    /// Last modification timestamp.
    pub last_update: String,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            unit_price_cents: product.unit_price_cents,
            collection_id: product.collection_id,
            last_update: product.last_update.to_rfc3339(),
        }
    }
}

/// One page of products.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    /// The rows on this page.
    pub items: Vec<ProductResponse>,
    /// Total rows matching the filter.
    pub total: i64,
    /// 1-based page number.
    pub page: i64,
    /// Rows per page.
    pub page_size: i64,
}

/// Create / full-replace request body.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    /// Display title.
    pub title: String,
    /// Longer description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price in cents.
    pub unit_price_cents: i64,
    /// Owning collection, if any.
    #[serde(default)]
    pub collection_id: Option<i64>,
}

/// Partial update request body. Absent fields are left unchanged.
///
/// An explicit `null` is treated the same as an absent field, so a PATCH
/// cannot clear `description` or `collection_id`; send a PUT with the full
/// payload to do that.
#[derive(Debug, Deserialize)]
pub struct ProductPatchRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New unit price in cents.
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
    /// New owning collection.
    #[serde(default)]
    pub collection_id: Option<i64>,
}

/// Query parameters accepted by the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Free-text search over title and description.
    #[serde(default)]
    pub search: Option<String>,
    /// Restrict to one collection.
    #[serde(default)]
    pub collection_id: Option<i64>,
    /// Minimum unit price in cents, inclusive.
    #[serde(default)]
    pub price_min: Option<i64>,
    /// Maximum unit price in cents, inclusive.
    #[serde(default)]
    pub price_max: Option<i64>,
    /// Sort field: `unit_price` or `last_update`, `-` prefix for descending.
    #[serde(default)]
    pub ordering: Option<String>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<i64>,
    /// Rows per page, capped by the configured maximum.
    #[serde(default)]
    pub page_size: Option<i64>,
}

fn parse_ordering(raw: &str) -> Result<ProductOrdering, ApiError> {
    match raw {
        "unit_price" => Ok(ProductOrdering::UnitPriceAsc),
        "-unit_price" => Ok(ProductOrdering::UnitPriceDesc),
        "last_update" => Ok(ProductOrdering::LastUpdateAsc),
        "-last_update" => Ok(ProductOrdering::LastUpdateDesc),
        _ => Err(ApiError::validation(
            "ordering",
            "Valid values: unit_price, -unit_price, last_update, -last_update.",
        )),
    }
}

/// Validate a full product payload and resolve it into store input.
async fn validate_product(
    state: &AppState,
    body: ProductRequest,
) -> Result<ProductInput, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::validation("title", "This field may not be blank."));
    }
    if body.unit_price_cents < 0 {
        return Err(ApiError::validation(
            "unit_price_cents",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if let Some(collection_id) = body.collection_id {
        if state.store.get_collection(collection_id).await?.is_none() {
            return Err(ApiError::validation(
                "collection_id",
                "No collection with this id.",
            ));
        }
    }

    Ok(ProductInput {
        title: body.title,
        description: body.description,
        unit_price_cents: body.unit_price_cents,
        collection_id: body.collection_id,
    })
}

/// List products with search, filtering, ordering, and pagination.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let ordering = query.ordering.as_deref().map(parse_ordering).transpose()?;

    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(ApiError::validation("page", "Pages are numbered from 1."));
    }

    let page_size = query
        .page_size
        .unwrap_or(state.config.default_page_size)
        .min(state.config.max_page_size);
    if page_size < 1 {
        return Err(ApiError::validation(
            "page_size",
            "Ensure this value is greater than or equal to 1.",
        ));
    }

    // Checked so an absurd page number is a validation error, not an
    // integer overflow.
    let offset = (page - 1)
        .checked_mul(page_size)
        .ok_or_else(|| ApiError::validation("page", "Page number out of range."))?;

    let filter = ProductFilter {
        search: query.search,
        collection_id: query.collection_id,
        price_min_cents: query.price_min,
        price_max_cents: query.price_max,
        ordering,
        limit: page_size,
        offset,
    };

    let result = state.store.list_products(&filter).await?;

    Ok(Json(ProductListResponse {
        items: result.items.iter().map(ProductResponse::from).collect(),
        total: result.total,
        page,
        page_size,
    }))
}

/// Create a product. Admin only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let input = validate_product(&state, body).await?;
    let product = state.store.insert_product(&input).await?;

    tracing::info!(product_id = product.id, user_id = %admin.0.user_id, "product created");

    Ok(Json(ProductResponse::from(&product)))
}

/// Get one product.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .store
        .get_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".into()))?;

    Ok(Json(ProductResponse::from(&product)))
}

/// Replace a product. Admin only.
pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(product_id): Path<i64>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let input = validate_product(&state, body).await?;
    let product = state.store.update_product(product_id, &input).await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// Partially update a product. Admin only.
pub async fn patch(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(product_id): Path<i64>,
    Json(body): Json<ProductPatchRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let existing = state
        .store
        .get_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".into()))?;

    let merged = ProductRequest {
        title: body.title.unwrap_or(existing.title),
        description: body.description.or(existing.description),
        unit_price_cents: body.unit_price_cents.unwrap_or(existing.unit_price_cents),
        collection_id: body.collection_id.or(existing.collection_id),
    };

    let input = validate_product(&state, merged).await?;
    let product = state.store.update_product(product_id, &input).await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// Delete a product, unless an order item references it. Admin only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(product_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.store.get_product(product_id).await?.is_none() {
        return Err(ApiError::NotFound("product not found".into()));
    }

    let references = state
        .store
        .count_order_items_for_product(product_id)
        .await?;
    if references > 0 {
        tracing::info!(product_id, references, "product delete blocked by order items");
        return Err(ApiError::DeleteBlocked(PRODUCT_IN_ORDER_REASON.into()));
    }

    state.store.delete_product(product_id).await?;

    tracing::info!(product_id, user_id = %admin.0.user_id, "product deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
