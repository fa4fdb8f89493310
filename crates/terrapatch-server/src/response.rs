//! JSON bodies returned by the service.

use serde::{Deserialize, Serialize};
use terrapatch_patch::ElevationPatch;

/// Successful `/terrain` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainResponse {
    /// Number of rows, kept for clients that assume square patches.
    pub n: usize,
    /// Number of rows in `elevation`.
    pub rows: usize,
    /// Number of columns in each row of `elevation`.
    pub cols: usize,
    /// Smallest elevation in the patch.
    pub min: f32,
    /// Largest elevation in the patch.
    pub max: f32,
    /// Elevations, row-major, north row first.
    pub elevation: Vec<Vec<f32>>,
}

impl From<&ElevationPatch> for TerrainResponse {
    fn from(patch: &ElevationPatch) -> Self {
        Self {
            n: patch.rows(),
            rows: patch.rows(),
            cols: patch.cols(),
            min: patch.min,
            max: patch.max,
            elevation: patch.elevation.to_nested(),
        }
    }
}

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable reason.
    pub error: String,
}

impl ErrorBody {
    /// Wrap a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
