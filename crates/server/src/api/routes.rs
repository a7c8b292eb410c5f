use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeFile, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, spots};
use crate::state::AppState;

/// Router for the catalog pages.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Catalog pages
        .route("/", get(spots::index))
        .route("/search", get(spots::search))
        .route("/add", post(spots::add_spot))
        .route("/recommend/{id}", post(spots::recommend_spot))
        .route("/update/{id}", post(spots::update_spot))
        .route("/delete/{id}", post(spots::delete_spot))
        .route("/batchdelete", post(spots::batch_delete))
        // Operations
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the second listener: one static file at `/`.
pub fn create_static_router(file: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(file))
        .layer(TraceLayer::new_for_http())
}
