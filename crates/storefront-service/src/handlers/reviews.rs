//! Review handlers, nested under their parent product.
//!
//! Every operation resolves the parent product first, so a review reached
//! through the wrong product path is a 404 even when the review id exists.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use storefront_core::{Review, MAX_RATING, MIN_RATING};
use storefront_store::{ReviewInput, Store};

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::extract::Path;
use crate::state::AppState;

/// Review response.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// Review id.
    pub id: i64,
    /// Parent product id.
    pub product_id: i64,
    /// Reviewer display name.
    pub name: String,
    /// Review body.
    pub text: String,
    /// Optional star rating.
    pub rating: Option<i64>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            name: review.name.clone(),
            text: review.text.clone(),
            rating: review.rating,
        }
    }
}

/// Create / full-replace request body.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Reviewer display name.
    pub name: String,
    /// Review body.
    pub text: String,
    /// Optional star rating, 1 through 5.
    #[serde(default)]
    pub rating: Option<i64>,
}

/// Partial update request body.
#[derive(Debug, Deserialize)]
pub struct ReviewPatchRequest {
    /// New reviewer name.
    #[serde(default)]
    pub name: Option<String>,
    /// New body.
    #[serde(default)]
    pub text: Option<String>,
    /// New rating.
    #[serde(default)]
    pub rating: Option<i64>,
}

/// Query parameters accepted by the review listing.
#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    /// Free-text search over the review body.
    #[serde(default)]
    pub search: Option<String>,
}

fn validate_review(body: ReviewRequest) -> Result<ReviewInput, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("name", "This field may not be blank."));
    }
    if body.text.trim().is_empty() {
        return Err(ApiError::validation("text", "This field may not be blank."));
    }
    if let Some(rating) = body.rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ApiError::validation(
                "rating",
                "Ensure this value is between 1 and 5.",
            ));
        }
    }

    Ok(ReviewInput {
        name: body.name,
        text: body.text,
        rating: body.rating,
    })
}

/// 404 unless the parent product exists.
async fn ensure_product(state: &AppState, product_id: i64) -> Result<(), ApiError> {
    state
        .store
        .get_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".into()))?;
    Ok(())
}

/// List a product's reviews.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    ensure_product(&state, product_id).await?;

    let reviews = state
        .store
        .list_reviews(product_id, query.search.as_deref())
        .await?;

    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}

/// Create a review under a product. Admin only.
pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(product_id): Path<i64>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    ensure_product(&state, product_id).await?;

    let input = validate_review(body)?;
    let review = state.store.insert_review(product_id, &input).await?;

    tracing::info!(product_id, review_id = review.id, "review created");

    Ok(Json(ReviewResponse::from(&review)))
}

/// Get one review, scoped to its parent product.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Path((product_id, id)): Path<(i64, i64)>,
) -> Result<Json<ReviewResponse>, ApiError> {
    ensure_product(&state, product_id).await?;

    let review = state
        .store
        .get_review(product_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("review not found".into()))?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// Replace a review. Admin only.
pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path((product_id, id)): Path<(i64, i64)>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    ensure_product(&state, product_id).await?;

    let input = validate_review(body)?;
    let review = state.store.update_review(product_id, id, &input).await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// Partially update a review. Admin only.
pub async fn patch(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path((product_id, id)): Path<(i64, i64)>,
    Json(body): Json<ReviewPatchRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    ensure_product(&state, product_id).await?;

    let existing = state
        .store
        .get_review(product_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("review not found".into()))?;

    let merged = ReviewRequest {
        name: body.name.unwrap_or(existing.name),
        text: body.text.unwrap_or(existing.text),
        rating: body.rating.or(existing.rating),
    };

    let input = validate_review(merged)?;
    let review = state.store.update_review(product_id, id, &input).await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// Delete a review. Admin only.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path((product_id, id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    ensure_product(&state, product_id).await?;

    state.store.delete_review(product_id, id).await?;

    tracing::info!(product_id, review_id = id, "review deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
