//! Route definitions

use std::sync::Arc;
use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{handlers, state::AppState, ServerError};

async fn handle_404(uri: Uri) -> ServerError {
    ServerError::NotFound(uri.path().to_string())
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::serve_index))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health_check))
        .fallback(handle_404)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
