//! armory-dash library - character dashboard service
//!
//! Serves filter options and aggregate views over the character table as JSON.
//! The database is opened read-only; the dataset lives in a [`CharacterCache`]
//! owned by the service state and reloaded on request.

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cache;
pub mod error;
pub mod views;

pub use cache::CharacterCache;
pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: CharacterCache,
}

impl AppState {
    pub fn new(cache: CharacterCache) -> Self {
        Self { cache }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::dashboard_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
