pub mod config;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use adboard_api::AppState;

/// Resource routes plus the transport layers the server runs with.
pub fn app(state: AppState, body_limit: usize) -> Router {
    adboard_api::router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
