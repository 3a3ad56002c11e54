//! Route Definitions

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::server::handlers;
use crate::server::state::AppState;

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/templates", get(handlers::list_templates))
        .route("/api/skills", post(handlers::generate_skill))
        .route("/api/skills/validate", post(handlers::validate_skill))
        .route("/api/downloads", post(handlers::prepare_download))
        .route(
            "/api/downloads/:skill_id",
            post(handlers::store_skill).get(handlers::download_skill),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
