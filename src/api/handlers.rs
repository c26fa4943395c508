use crate::api::AppState;
use crate::board::{BoardSnapshot, LoadStatus, ViewUpdate};
use crate::config::PresentationConfig;
use crate::error::{AppError, Result};
use crate::pipeline::Facets;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Displayed jobs with loading status and the active view
pub async fn get_jobs(State(state): State<AppState>) -> Json<BoardSnapshot> {
    Json(state.board.snapshot())
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    /// Apply the query after the debounce delay instead of immediately
    #[serde(default)]
    pub debounce: bool,
}

/// Change query, filters and/or sort option
pub async fn update_view(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
    Json(request): Json<ViewUpdate>,
) -> Result<Json<BoardSnapshot>> {
    let mut update = request.validated()?;

    if params.debounce {
        if let Some(query) = update.query.take() {
            debug!(query = %query, "Scheduling debounced query");
            state.board.schedule_query(query);
        }
    }

    let snapshot = state.board.apply_view(update)?;
    Ok(Json(snapshot))
}

/// Distinct values for every filter dimension
pub async fn get_facets(State(state): State<AppState>) -> Json<Facets> {
    Json(state.board.facets())
}

pub async fn get_status(State(state): State<AppState>) -> Json<LoadStatus> {
    Json(state.board.status())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    /// False when a load was already running
    pub started: bool,
    pub status: LoadStatus,
}

/// Start a fresh load of every source
pub async fn reload(State(state): State<AppState>) -> (StatusCode, Json<ReloadResponse>) {
    let started = state.board.reload();
    (
        StatusCode::ACCEPTED,
        Json(ReloadResponse {
            started,
            status: state.board.status(),
        }),
    )
}

pub async fn get_presentation(State(state): State<AppState>) -> Json<PresentationConfig> {
    Json(state.presentation.as_ref().clone())
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    if !state.metrics_enabled {
        return Err(AppError::NotFound("metrics are disabled".to_string()));
    }

    let metrics = crate::metrics::gather_metrics();
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics,
    ))
}
