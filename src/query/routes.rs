//! HTTP handlers for the query server.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use postfinder::config::RegionConfig;
use postfinder::dataset::LoadDiagnostics;
use postfinder::export::ResultExporter;
use postfinder::models::{RegionLookup, ResultSet};
use postfinder::{FacilityRecord, FinderError, PointRecord, QueryCoordinator};

use crate::error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    pub coordinator: QueryCoordinator,
    /// Region-annotated boundaries, when a boundary file is configured
    pub boundaries: Option<FeatureCollection>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/radius", get(radius_handler))
        .route("/v1/radius.csv", get(radius_csv_handler))
        .route("/v1/region", get(region_handler))
        .route("/v1/nearest", get(nearest_handler))
        .route("/v1/regions", get(regions_handler))
        .route("/v1/boundaries", get(boundaries_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    postcodes: usize,
    facilities: usize,
    diagnostics: LoadDiagnostics,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.coordinator.store();
    Json(HealthResponse {
        status: "ok",
        postcodes: store.len(),
        facilities: state.coordinator.facilities().len(),
        diagnostics: store.diagnostics(),
    })
}

#[derive(Debug, Deserialize)]
struct RadiusQueryParams {
    postcode: Option<String>,
    radius: Option<String>,
}

impl RadiusQueryParams {
    fn search(&self, coordinator: &QueryCoordinator) -> Result<ResultSet<PointRecord>, ApiError> {
        Ok(coordinator.radius_search(
            self.postcode.as_deref().unwrap_or_default(),
            self.radius.as_deref().unwrap_or_default(),
        )?)
    }
}

/// Postcodes within a radius, as JSON
async fn radius_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RadiusQueryParams>,
) -> Result<Json<ResultSet<PointRecord>>, ApiError> {
    Ok(Json(params.search(&state.coordinator)?))
}

/// Postcodes within a radius, as a CSV download
async fn radius_csv_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RadiusQueryParams>,
) -> Result<Response, ApiError> {
    let result = params.search(&state.coordinator)?;

    let exporter = ResultExporter::new(state.coordinator.store().schema().clone());
    let body = exporter.to_csv(&result).map_err(FinderError::from)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        ResultExporter::suggested_filename(&result)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
struct RegionQueryParams {
    postcode: Option<String>,
}

/// Care region of a postcode, with nearby facilities when it is outside all of them
async fn region_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegionQueryParams>,
) -> Result<Json<RegionLookup>, ApiError> {
    let lookup = state
        .coordinator
        .region_lookup(params.postcode.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(lookup))
}

#[derive(Debug, Deserialize)]
struct NearestQueryParams {
    lat: Option<f64>,
    lon: Option<f64>,
    k: Option<i64>,
}

async fn nearest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearestQueryParams>,
) -> Result<Json<ResultSet<FacilityRecord>>, ApiError> {
    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(FinderError::Validation("lat and lon are required".to_string()).into());
    };
    let k = params
        .k
        .unwrap_or(state.coordinator.fallback_facilities() as i64);
    Ok(Json(state.coordinator.nearest_facilities(lat, lon, k)?))
}

async fn regions_handler(State(state): State<Arc<AppState>>) -> Json<Vec<RegionConfig>> {
    Json(state.coordinator.classifier().regions().to_vec())
}

async fn boundaries_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    match &state.boundaries {
        Some(collection) => Ok(Json(collection).into_response()),
        None => Err(ApiError::not_found("No boundary file configured")),
    }
}
