//! Collection handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use storefront_core::Collection;
use storefront_store::Store;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::extract::Path;
use crate::state::AppState;

/// Reason returned when a collection delete is vetoed because products
/// still reference it.
pub const COLLECTION_HAS_PRODUCTS_REASON: &str =
    "Collection cannot be deleted because it includes one or more products.";

/// Collection response, carrying the live product count.
#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    /// Collection id.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Number of products referencing this collection at query time.
    pub products_count: i64,
}

impl From<&Collection> for CollectionResponse {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id,
            title: collection.title.clone(),
            products_count: collection.products_count,
        }
    }
}

/// Create / rename request body.
#[derive(Debug, Deserialize)]
pub struct CollectionRequest {
    /// Display title.
    pub title: String,
}

/// Query parameters accepted by the collection listing.
#[derive(Debug, Deserialize)]
pub struct CollectionListQuery {
    /// Free-text search over the title.
    #[serde(default)]
    pub search: Option<String>,
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("title", "This field may not be blank."));
    }
    Ok(())
}

/// List collections with their product counts.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CollectionListQuery>,
) -> Result<Json<Vec<CollectionResponse>>, ApiError> {
    let collections = state.store.list_collections(query.search.as_deref()).await?;

    Ok(Json(
        collections.iter().map(CollectionResponse::from).collect(),
    ))
}

/// Create a collection. Admin only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(body): Json<CollectionRequest>,
) -> Result<Json<CollectionResponse>, ApiError> {
    validate_title(&body.title)?;
    let collection = state.store.insert_collection(&body.title).await?;

    tracing::info!(collection_id = collection.id, user_id = %admin.0.user_id, "collection created");

    Ok(Json(CollectionResponse::from(&collection)))
}

/// Get one collection.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let collection = state
        .store
        .get_collection(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("collection not found".into()))?;

    Ok(Json(CollectionResponse::from(&collection)))
}

/// Rename a collection. Admin only. PUT and PATCH share this handler since
/// `title` is the only mutable field.
pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<CollectionRequest>,
) -> Result<Json<CollectionResponse>, ApiError> {
    validate_title(&body.title)?;
    let collection = state.store.update_collection(id, &body.title).await?;

    Ok(Json(CollectionResponse::from(&collection)))
}

/// Delete a collection, unless products still reference it. Admin only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.store.get_collection(id).await?.is_none() {
        return Err(ApiError::NotFound("collection not found".into()));
    }

    let references = state.store.count_products_in_collection(id).await?;
    if references > 0 {
        tracing::info!(
            collection_id = id,
            references,
            "collection delete blocked by referencing products"
        );
        return Err(ApiError::DeleteBlocked(
            COLLECTION_HAS_PRODUCTS_REASON.into(),
        ));
    }

    state.store.delete_collection(id).await?;

    tracing::info!(collection_id = id, user_id = %admin.0.user_id, "collection deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
