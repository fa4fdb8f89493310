//! HTTP routes.

use crate::error::ApiError;
use crate::response::TerrainResponse;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use terrapatch_patch::{OpenRaster, PatchExtractor, PatchQuery, DEFAULT_PATCH_SIZE};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, instrument};

/// Query string of `GET /terrain`.
#[derive(Debug, Deserialize)]
pub struct TerrainParams {
    lat: Option<f64>,
    lon: Option<f64>,
    n: Option<u32>,
}

impl TerrainParams {
    fn into_query(self) -> Result<PatchQuery, ApiError> {
        let lat = self.lat.ok_or_else(|| ApiError::bad_request("lat is required"))?;
        let lon = self.lon.ok_or_else(|| ApiError::bad_request("lon is required"))?;
        let n = self.n.unwrap_or(DEFAULT_PATCH_SIZE);
        Ok(PatchQuery::new(lat, lon, n)?)
    }
}

/// Build the service router around an extractor.
///
/// Cross-origin requests are allowed from anywhere.
pub fn router<O>(extractor: PatchExtractor<O>) -> Router
where
    O: OpenRaster + 'static,
{
    Router::new()
        .route("/terrain", get(terrain_handler::<O>))
        .route("/health", get(health_handler))
        .with_state(Arc::new(extractor))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[instrument(skip_all)]
async fn terrain_handler<O>(
    State(extractor): State<Arc<PatchExtractor<O>>>,
    params: Result<Query<TerrainParams>, QueryRejection>,
) -> Response
where
    O: OpenRaster + 'static,
{
    let query = match params
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
        .and_then(|Query(params)| params.into_query())
    {
        Ok(query) => query,
        Err(err) => return err.into_response(),
    };
    debug!(lat = query.lat(), lon = query.lon(), n = query.size(), "terrain request");

    // Raster reads are blocking file I/O.
    let result = tokio::task::spawn_blocking(move || extractor.extract(&query)).await;
    match result {
        Ok(Ok(patch)) => {
            debug!(
                rows = patch.rows(),
                cols = patch.cols(),
                filled = patch.filled,
                "served patch"
            );
            Json(TerrainResponse::from(&patch)).into_response()
        }
        Ok(Err(err)) => ApiError::from(err).into_response(),
        Err(join_err) => ApiError::internal(format!("extraction task failed: {join_err}")).into_response(),
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
