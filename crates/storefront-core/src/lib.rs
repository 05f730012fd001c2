//! Core types for the storefront service.
//!
//! This crate provides the foundational types used throughout the storefront
//! platform:
//!
//! - **Identifiers**: `UserId`, `CartId`
//! - **Catalog**: `Product`, `Collection`, `Review`
//! - **Carts**: `Cart`, `CartItem`
//! - **Customers**: `Customer`
//! - **Orders**: `Order`, `OrderItem`
//!
//! # Money
//!
//! Monetary amounts are stored as `i64` integer cents to avoid floating point
//! precision issues: a $19.99 product stores `unit_price_cents = 1999`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod ids;
pub mod order;

pub use cart::{Cart, CartItem};
pub use catalog::{Collection, Product, Review, MAX_RATING, MIN_RATING};
pub use customer::Customer;
pub use ids::{CartId, IdError, UserId};
pub use order::{Order, OrderItem};
