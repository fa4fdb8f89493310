//! Validated patch requests.

use crate::{PatchError, Result};

/// Smallest accepted patch size, in pixels.
pub const MIN_PATCH_SIZE: u32 = 16;
/// Largest accepted patch size, in pixels.
pub const MAX_PATCH_SIZE: u32 = 512;
/// Patch size used when a request does not name one.
pub const DEFAULT_PATCH_SIZE: u32 = 128;

/// A request for an `size` x `size` patch centered on a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchQuery {
    lat: f64,
    lon: f64,
    size: u32,
}

impl PatchQuery {
    /// Validate and build a query.
    ///
    /// # Arguments
    /// * `lat` - Latitude in decimal degrees
    /// * `lon` - Longitude in decimal degrees
    /// * `size` - Patch edge length in pixels, within
    ///   [`MIN_PATCH_SIZE`]..=[`MAX_PATCH_SIZE`]
    pub fn new(lat: f64, lon: f64, size: u32) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(PatchError::InvalidCoordinate { lat, lon });
        }
        if !(MIN_PATCH_SIZE..=MAX_PATCH_SIZE).contains(&size) {
            return Err(PatchError::InvalidSize {
                size,
                min: MIN_PATCH_SIZE,
                max: MAX_PATCH_SIZE,
            });
        }
        Ok(Self { lat, lon, size })
    }

    /// Center latitude.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Center longitude.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Requested edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }
}
