//! Error types for the raster crate.

use crate::PixelWindow;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when opening or reading an elevation raster.
#[derive(Debug, Error)]
pub enum DemError {
    /// The raster file does not exist at the configured location.
    #[error("Raster file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - missing or unusable geo-referencing.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Unsupported pixel layout in the TIFF file.
    #[error("Unsupported TIFF data type: {0}")]
    UnsupportedDataType(String),

    /// A window read was requested outside the raster extent.
    #[error("Window {window:?} is outside the {width}x{height} raster")]
    WindowOutOfBounds {
        /// Requested window.
        window: PixelWindow,
        /// Raster width in pixels.
        width: u32,
        /// Raster height in pixels.
        height: u32,
    },

    /// Sample buffer does not match the declared raster dimensions.
    #[error("Expected {expected} samples, got {actual}")]
    DimensionMismatch {
        /// Number of samples implied by width x height.
        expected: usize,
        /// Number of samples supplied.
        actual: usize,
    },
}

impl DemError {
    /// Whether this error means the raster could not be located at all.
    pub fn is_unavailable(&self) -> bool {
        match self {
            DemError::NotFound(_) => true,
            DemError::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
