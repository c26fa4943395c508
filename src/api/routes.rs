use crate::api::{handlers, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        // Job board
        .route("/v1/jobs", get(handlers::get_jobs))
        .route("/v1/view", put(handlers::update_view))
        .route("/v1/facets", get(handlers::get_facets))
        .route("/v1/status", get(handlers::get_status))
        .route("/v1/reload", post(handlers::reload))
        .route("/v1/presentation", get(handlers::get_presentation))
        // Observability
        .route("/metrics", get(handlers::metrics))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
