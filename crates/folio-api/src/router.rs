//! Route definitions for the Folio HTTP API.
//!
//! All routes are mounted under `/api` and receive `AppState` through Axum's
//! `State` extractor.

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(upstream_routes())
        .merge(presence_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// GitHub, stats.fm, wttr.in, and local song routes
fn upstream_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(handlers::upstream::projects))
        .route("/stats", get(handlers::upstream::github_stats))
        .route("/music", get(handlers::upstream::music_stats))
        .route("/weather", get(handlers::upstream::weather))
        .route("/songs", get(handlers::upstream::songs))
}

fn presence_routes() -> Router<AppState> {
    Router::new().route("/presence", get(handlers::presence::presence))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
