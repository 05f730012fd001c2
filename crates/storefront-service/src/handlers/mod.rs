//! HTTP request handlers, one module per resource.

pub mod carts;
pub mod collections;
pub mod customers;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
