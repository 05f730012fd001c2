//! Authentication extractors.
//!
//! This module provides extractors for:
//! - `AuthUser` - any caller with a valid bearer token
//! - `AdminUser` - a caller whose token carries the staff flag
//!
//! The identity provider is external; tokens are HS256 JWTs signed with the
//! shared secret from [`crate::ServiceConfig`]. Role and permission flags
//! ride along as claims, so the service never calls out to validate a
//! request.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use storefront_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Named permission required by the customer "history" action.
pub const PERM_VIEW_HISTORY: &str = "view_history";

/// An authenticated caller extracted from a bearer JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// Whether the token carries the staff (admin) flag.
    pub staff: bool,
    /// Named permissions granted to the caller.
    pub perms: Vec<String>,
}

impl AuthUser {
    /// Whether the caller holds a named permission. Staff hold all of them.
    #[must_use]
    pub fn has_perm(&self, name: &str) -> bool {
        self.staff || self.perms.iter().any(|p| p == name)
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Extract the Authorization header
            let auth_header = parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            // Extract the Bearer token
            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(ApiError::Unauthorized)?;

            // Allow test tokens in testing only.
            // This bypass is gated behind #[cfg(test)] or the "test-auth"
            // feature to ensure it is never active in production builds.
            #[cfg(any(test, feature = "test-auth"))]
            if let Some(rest) = token.strip_prefix("test-token:") {
                return parse_test_token(rest);
            }

            let claims = validate_jwt(token, state)?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser {
                user_id,
                staff: claims.staff,
                perms: claims.perms,
            })
        })
    }
}

/// A caller holding the staff flag. Rejects non-staff with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = AuthUser::from_request_parts(parts, state).await?;

            if !user.staff {
                return Err(ApiError::Forbidden);
            }

            tracing::debug!(user_id = %user.user_id, "staff caller authenticated");

            Ok(Self(user))
        })
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Staff (admin) flag.
    #[serde(default)]
    pub staff: bool,
    /// Named permissions.
    #[serde(default)]
    pub perms: Vec<String>,
    /// Audience.
    pub aud: String,
    /// Issuer.
    pub iss: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}

/// Validate a bearer JWT against the configured shared secret.
fn validate_jwt(token: &str, state: &AppState) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[&state.config.auth_audience]);
    validation.set_issuer(&[&state.config.auth_issuer]);

    let key = DecodingKey::from_secret(state.config.auth_secret.as_bytes());

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}

/// Parse a `test-token:` bypass token.
///
/// The format is `<user-uuid>[:staff][:<perm>...]`.
#[cfg(any(test, feature = "test-auth"))]
fn parse_test_token(rest: &str) -> Result<AuthUser, ApiError> {
    let mut segments = rest.split(':');

    let user_id = segments
        .next()
        .and_then(|s| s.parse::<UserId>().ok())
        .ok_or(ApiError::Unauthorized)?;

    let mut staff = false;
    let mut perms = Vec::new();
    for segment in segments {
        if segment == "staff" {
            staff = true;
        } else {
            perms.push(segment.to_string());
        }
    }

    Ok(AuthUser {
        user_id,
        staff,
        perms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parses_flags() {
        let id = UserId::generate();
        let user = parse_test_token(&format!("{id}:staff:view_history")).unwrap();
        assert_eq!(user.user_id, id);
        assert!(user.staff);
        assert!(user.has_perm(PERM_VIEW_HISTORY));
    }

    #[test]
    fn staff_implies_every_permission() {
        let user = AuthUser {
            user_id: UserId::generate(),
            staff: true,
            perms: Vec::new(),
        };
        assert!(user.has_perm("anything"));
    }

    #[test]
    fn test_token_rejects_bad_uuid() {
        assert!(parse_test_token("not-a-uuid").is_err());
    }
}
