//! Application state.

use std::sync::Arc;

use storefront_store::SqliteStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<SqliteStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(store: Arc<SqliteStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }
}
