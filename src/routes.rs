use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    grid::{lat_lon_to_grid, GridCell},
    utils::validate_coordinates,
    weather::{fetcher::WindFetcher, types::WindObservation},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<WindFetcher>,
}

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct WindQuery {
    pub lat: f64,
    pub lon: f64,
    pub site_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

// Route handlers
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_grid_cell(
    Query(params): Query<GridQuery>,
) -> Result<Json<GridCell>, StatusCode> {
    if let Err(e) = validate_coordinates(params.lat, params.lon) {
        tracing::error!("Grid conversion rejected: {}", e);
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(lat_lon_to_grid(params.lat, params.lon)))
}

pub async fn get_wind(
    State(state): State<AppState>,
    Query(params): Query<WindQuery>,
) -> Result<Json<WindObservation>, StatusCode> {
    if let Err(e) = validate_coordinates(params.lat, params.lon) {
        tracing::error!("Wind lookup rejected: {}", e);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state
        .fetcher
        .fetch_wind(params.lat, params.lon, &params.site_id)
        .await
    {
        Some(observation) => Ok(Json(observation)),
        None => Err(StatusCode::BAD_GATEWAY),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/grid", get(get_grid_cell))
        .route("/api/wind", get(get_wind))
        .with_state(state)
}
