//! Affine geo-transform between geographic coordinates and pixel indices.

use crate::{DemError, Result};

/// Six-coefficient affine transform in GDAL order.
///
/// A pixel corner `(row, col)` maps to geographic coordinates as:
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up rasters both rotation terms are zero and `pixel_height`
/// is negative, so rows grow southward and columns grow eastward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// Longitude (x) of the top-left corner of pixel (0, 0).
    pub origin_x: f64,
    /// Size of a pixel along x, per column.
    pub pixel_width: f64,
    /// Contribution of the row index to x.
    pub row_rotation: f64,
    /// Latitude (y) of the top-left corner of pixel (0, 0).
    pub origin_y: f64,
    /// Contribution of the column index to y.
    pub col_rotation: f64,
    /// Size of a pixel along y, per row (negative for north-up).
    pub pixel_height: f64,
}

/// Geographic extent of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum latitude (south edge).
    pub min_lat: f64,
    /// Maximum latitude (north edge).
    pub max_lat: f64,
    /// Minimum longitude (west edge).
    pub min_lon: f64,
    /// Maximum longitude (east edge).
    pub max_lon: f64,
}

impl GeoBounds {
    /// Check if a coordinate is within the bounds.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

impl GeoTransform {
    /// North-up transform from an origin and positive pixel sizes.
    ///
    /// `scale_y` is the pixel height in degrees; rows advance southward.
    pub fn north_up(origin_x: f64, origin_y: f64, scale_x: f64, scale_y: f64) -> Result<Self> {
        Self::checked(Self {
            origin_x,
            pixel_width: scale_x,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height: -scale_y,
        })
    }

    /// Build from GeoTIFF `ModelTiepoint` and `ModelPixelScale` values.
    ///
    /// Tiepoint format: `[i, j, k, x, y, z]` where `(i, j)` is a raster
    /// position and `(x, y)` its model coordinate.
    pub fn from_tiepoint_and_scale(tiepoint: &[f64], scale: &[f64]) -> Result<Self> {
        if tiepoint.len() < 6 || scale.len() < 2 {
            return Err(DemError::InvalidGeoTiff(format!(
                "tiepoint needs 6 values and pixel scale 2, got {} and {}",
                tiepoint.len(),
                scale.len()
            )));
        }
        let (i, j) = (tiepoint[0], tiepoint[1]);
        let (x, y) = (tiepoint[3], tiepoint[4]);
        let (scale_x, scale_y) = (scale[0], scale[1]);

        Self::north_up(x - i * scale_x, y + j * scale_y, scale_x, scale_y)
    }

    /// Build from a 4x4 row-major GeoTIFF `ModelTransformation` matrix.
    pub fn from_model_transformation(matrix: &[f64]) -> Result<Self> {
        if matrix.len() < 16 {
            return Err(DemError::InvalidGeoTiff(format!(
                "model transformation needs 16 values, got {}",
                matrix.len()
            )));
        }
        Self::checked(Self {
            origin_x: matrix[3],
            pixel_width: matrix[0],
            row_rotation: matrix[1],
            origin_y: matrix[7],
            col_rotation: matrix[4],
            pixel_height: matrix[5],
        })
    }

    /// The same transform with its origin moved back by half a pixel.
    ///
    /// Used for PixelIsPoint rasters, whose model coordinates refer to
    /// pixel centers rather than corners.
    pub fn shifted_half_pixel(&self) -> Self {
        Self {
            origin_x: self.origin_x - 0.5 * self.pixel_width - 0.5 * self.row_rotation,
            origin_y: self.origin_y - 0.5 * self.col_rotation - 0.5 * self.pixel_height,
            ..*self
        }
    }

    fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    fn checked(transform: Self) -> Result<Self> {
        let det = transform.determinant();
        if !det.is_finite() || det == 0.0 {
            return Err(DemError::InvalidGeoTiff(format!(
                "geo-transform is not invertible: {transform:?}"
            )));
        }
        Ok(transform)
    }

    /// Fractional pixel position `(row, col)` of a geographic coordinate.
    pub fn pixel_position(&self, lon: f64, lat: f64) -> (f64, f64) {
        let dx = lon - self.origin_x;
        let dy = lat - self.origin_y;
        let det = self.determinant();

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (self.pixel_width * dy - self.col_rotation * dx) / det;
        (row, col)
    }

    /// Pixel `(row, col)` containing a geographic coordinate.
    ///
    /// Fractional positions are floored, so a coordinate on a pixel edge
    /// belongs to the pixel whose top-left corner it is, and positions
    /// before the origin give negative indices. No extent check is made.
    pub fn index(&self, lon: f64, lat: f64) -> (i64, i64) {
        let (row, col) = self.pixel_position(lon, lat);
        (row.floor() as i64, col.floor() as i64)
    }

    /// Geographic coordinate `(lon, lat)` of a pixel's top-left corner.
    pub fn pixel_to_geo(&self, row: f64, col: f64) -> (f64, f64) {
        let lon = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let lat = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (lon, lat)
    }

    /// Geographic extent covered by a raster of the given size.
    pub fn bounds(&self, width: u32, height: u32) -> GeoBounds {
        let (w, h) = (width as f64, height as f64);
        let corners = [
            self.pixel_to_geo(0.0, 0.0),
            self.pixel_to_geo(0.0, w),
            self.pixel_to_geo(h, 0.0),
            self.pixel_to_geo(h, w),
        ];

        let mut bounds = GeoBounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for (lon, lat) in corners {
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.max_lat = bounds.max_lat.max(lat);
            bounds.min_lon = bounds.min_lon.min(lon);
            bounds.max_lon = bounds.max_lon.max(lon);
        }
        bounds
    }
}
