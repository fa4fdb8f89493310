//! Error types for patch extraction.

use terrapatch_dem::DemError;
use thiserror::Error;

/// Errors that can occur while extracting an elevation patch.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Opening or reading the raster failed.
    #[error(transparent)]
    Source(#[from] DemError),

    /// The requested window does not overlap the raster.
    #[error("No raster coverage around pixel ({row}, {col}) for a {size}x{size} patch")]
    EmptyWindow {
        /// Center row of the requested window.
        row: i64,
        /// Center column of the requested window.
        col: i64,
        /// Requested patch size.
        size: u32,
    },

    /// Every cell in the window is missing, so no fill value exists.
    #[error("All {cells} cells in the window are no-data")]
    AllMissing {
        /// Number of cells in the window.
        cells: usize,
    },

    /// Patch size outside the accepted range.
    #[error("Patch size {size} must be between {min} and {max}")]
    InvalidSize {
        /// Requested size.
        size: u32,
        /// Smallest accepted size.
        min: u32,
        /// Largest accepted size.
        max: u32,
    },

    /// Latitude or longitude is not a finite number.
    #[error("Invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
    },
}

impl PatchError {
    /// Whether the raster could not be located at all.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, PatchError::Source(err) if err.is_unavailable())
    }
}
