//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// One field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// The payload field at fault.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - valid credentials but insufficient permissions.
    #[error("forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Validation failure with field-level detail.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Deletion vetoed by a referential-integrity guard.
    ///
    /// Serialized as the legacy `{"Error": reason}` body with a 409 status.
    #[error("delete blocked: {0}")]
    DeleteBlocked(String),

    /// The verb exists in HTTP but this resource does not accept it.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for a single-field validation error.
    #[must_use]
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Legacy blocked-delete body, kept byte-compatible with the original API.
#[derive(Debug, Serialize)]
struct BlockedDeleteResponse {
    #[serde(rename = "Error")]
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // Blocked deletes keep the original client-visible shape, but
            // with a genuine conflict status instead of the legacy 200.
            Self::DeleteBlocked(reason) => {
                return (
                    StatusCode::CONFLICT,
                    Json(BlockedDeleteResponse {
                        error: reason.clone(),
                    }),
                )
                    .into_response();
            }
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
                serde_json::to_value(fields).ok(),
            ),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                self.to_string(),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<storefront_store::StoreError> for ApiError {
    fn from(err: storefront_store::StoreError) -> Self {
        match err {
            storefront_store::StoreError::NotFound { entity } => {
                Self::NotFound(format!("{entity} not found"))
            }
            storefront_store::StoreError::EmptyCart { .. } => {
                Self::validation("cart_id", "The cart is empty.")
            }
            storefront_store::StoreError::Database(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_delete_serializes_legacy_body() {
        let body = serde_json::to_value(BlockedDeleteResponse {
            error: "nope".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"Error": "nope"}));
    }
}
