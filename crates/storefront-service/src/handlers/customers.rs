//! Customer profile handlers.
//!
//! `/customers/me` is the self-service surface: the profile is created on
//! first access (get-or-create), so callers never have to register
//! explicitly. Access to `/customers/:id` is owner-or-staff; the history
//! action additionally requires the `view_history` permission.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storefront_core::Customer;
use storefront_store::{CustomerUpdate, OrderScope, Store};

use crate::auth::{AuthUser, PERM_VIEW_HISTORY};
use crate::error::ApiError;
use crate::extract::Path;
use crate::handlers::orders::OrderSummary;
use crate::state::AppState;

/// Customer response.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// Customer id.
    pub id: i64,
    /// The external identity this profile belongs to.
    pub user_id: String,
    /// Phone number, if set.
    pub phone: Option<String>,
    /// Date of birth, if set.
    pub birth_date: Option<String>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            user_id: customer.user_id.to_string(),
            phone: customer.phone.clone(),
            birth_date: customer.birth_date.clone(),
        }
    }
}

/// Profile update request body. Absent fields are left unchanged.
///
/// An explicit `null` is treated the same as an absent field; fields cannot
/// be cleared once set.
#[derive(Debug, Deserialize)]
pub struct CustomerUpdateRequest {
    /// New phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// New date of birth, `YYYY-MM-DD`.
    #[serde(default)]
    pub birth_date: Option<String>,
}

/// Reason returned when a customer delete is vetoed because orders still
/// reference the profile.
pub const CUSTOMER_HAS_ORDERS_REASON: &str =
    "Customer cannot be deleted because they have placed one or more orders.";

/// Order history response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The customer's orders, newest first.
    pub orders: Vec<OrderSummary>,
}

fn validate_update(body: CustomerUpdateRequest) -> Result<CustomerUpdate, ApiError> {
    if let Some(birth_date) = &body.birth_date {
        if NaiveDate::parse_from_str(birth_date, "%Y-%m-%d").is_err() {
            return Err(ApiError::validation(
                "birth_date",
                "Date has wrong format. Use YYYY-MM-DD.",
            ));
        }
    }

    Ok(CustomerUpdate {
        phone: body.phone,
        birth_date: body.birth_date,
    })
}

/// Fetch a customer and enforce owner-or-staff access.
async fn owned_customer(state: &AppState, auth: &AuthUser, id: i64) -> Result<Customer, ApiError> {
    let customer = state
        .store
        .get_customer(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("customer not found".into()))?;

    if !auth.staff && customer.user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(customer)
}

/// Get the caller's own profile, creating it on first access.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.store.get_or_create_customer(&auth.user_id).await?;

    Ok(Json(CustomerResponse::from(&customer)))
}

/// Update the caller's own profile, creating it on first access.
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CustomerUpdateRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let update = validate_update(body)?;
    let customer = state.store.get_or_create_customer(&auth.user_id).await?;
    let customer = state.store.update_customer(customer.id, &update).await?;

    tracing::info!(customer_id = customer.id, "customer profile updated");

    Ok(Json(CustomerResponse::from(&customer)))
}

/// Get a customer profile. Owner or staff.
pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = owned_customer(&state, &auth, id).await?;

    Ok(Json(CustomerResponse::from(&customer)))
}

/// Update a customer profile. Owner or staff. PUT and PATCH share this
/// handler since every profile field is optional.
pub async fn update(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<CustomerUpdateRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    owned_customer(&state, &auth, id).await?;

    let update = validate_update(body)?;
    let customer = state.store.update_customer(id, &update).await?;

    Ok(Json(CustomerResponse::from(&customer)))
}

/// Delete a customer profile, unless orders reference it. Owner or staff.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    owned_customer(&state, &auth, id).await?;

    let references = state.store.count_orders_for_customer(id).await?;
    if references > 0 {
        tracing::info!(customer_id = id, references, "customer delete blocked by orders");
        return Err(ApiError::DeleteBlocked(CUSTOMER_HAS_ORDERS_REASON.into()));
    }

    state.store.delete_customer(id).await?;

    tracing::info!(customer_id = id, "customer deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Order history for a customer. Requires the `view_history` permission.
pub async fn history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<HistoryResponse>, ApiError> {
    if !auth.has_perm(PERM_VIEW_HISTORY) {
        return Err(ApiError::Forbidden);
    }

    if state.store.get_customer(id).await?.is_none() {
        return Err(ApiError::NotFound("customer not found".into()));
    }

    let orders = state.store.list_orders(OrderScope::ByCustomer(id)).await?;

    Ok(Json(HistoryResponse {
        orders: orders.iter().map(OrderSummary::from).collect(),
    }))
}
