use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

/// Room left in the request body limit for the text fields and multipart framing.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize + MULTIPART_OVERHEAD;
    let public_dir = ServeDir::new(&state.config.server.public_dir);

    Router::new()
        // Content
        .route(
            "/api/content",
            get(handlers::get_content).post(handlers::save_content),
        )
        .route("/api/auth", post(handlers::authenticate))
        // Entries
        .route(
            "/api/submit",
            post(handlers::submit_entry).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/list", get(handlers::list_entries))
        .route("/api/words", get(handlers::list_words))
        .route("/api/gallery", get(handlers::gallery))
        .route("/api/entry/:id", delete(handlers::delete_entry))
        // Audio blobs
        .route("/uploads/:key", get(handlers::serve_upload))
        // Internal
        .route("/_internal/health", get(handlers::health))
        // Static pages
        .fallback_service(public_dir)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
