//! Storefront HTTP API Service.
//!
//! This crate provides the REST API for the storefront, including:
//!
//! - Product, collection, and review catalog management
//! - Anonymous shopping carts with quantity-merging line items
//! - Customer self-service profiles (get-or-create "me")
//! - Order placement by cart conversion, with scoped listings
//!
//! # Authentication
//!
//! Callers authenticate with a bearer JWT issued by an external identity
//! provider and validated against a shared secret. Staff and named
//! permissions ride along as claims. Catalog reads and cart operations
//! need no token at all.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for routing consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{AdminUser, AuthUser, Claims, PERM_VIEW_HISTORY};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
