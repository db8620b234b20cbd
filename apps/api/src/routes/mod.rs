pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::panic_response;
use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route(
            "/",
            get(health::welcome_handler).post(handlers::handle_submit),
        )
        .route("/health", get(health::health_handler))
        .route("/favicon.ico", get(health::favicon_handler))
        .route("/download/:filename", get(handlers::handle_download))
        .route("/dashboard", get(handlers::handle_dashboard))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}
