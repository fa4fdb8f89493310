//! The raster source abstraction and an in-memory implementation.

use crate::{DemError, GeoTransform, Grid, PixelWindow, Result};

/// A read-only, single-band elevation raster.
///
/// Implementations are opened for a single query and may keep decoder
/// state, so reads take `&mut self`.
pub trait RasterSource {
    /// Width of the raster in pixels.
    fn width(&self) -> u32;

    /// Height of the raster in pixels.
    fn height(&self) -> u32;

    /// Sentinel value marking cells without a measurement.
    fn nodata(&self) -> Option<f64>;

    /// Affine transform from pixel to geographic coordinates.
    fn geo_transform(&self) -> &GeoTransform;

    /// Pixel `(row, col)` containing a geographic coordinate.
    ///
    /// The result may lie outside the raster.
    fn index(&self, lon: f64, lat: f64) -> (i64, i64) {
        self.geo_transform().index(lon, lat)
    }

    /// Window covering the whole raster.
    fn extent(&self) -> PixelWindow {
        PixelWindow::full(self.width(), self.height())
    }

    /// Read the samples inside `window`, which must lie within the raster.
    fn read_window(&mut self, window: PixelWindow) -> Result<Grid>;
}

pub(crate) fn check_window(window: PixelWindow, width: u32, height: u32) -> Result<()> {
    if window.fits_within(width, height) {
        Ok(())
    } else {
        Err(DemError::WindowOutOfBounds {
            window,
            width,
            height,
        })
    }
}

/// Raster held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryRaster {
    data: Vec<f32>,
    width: u32,
    height: u32,
    transform: GeoTransform,
    nodata: Option<f64>,
}

impl MemoryRaster {
    /// Create a raster from row-major samples.
    pub fn new(width: u32, height: u32, data: Vec<f32>, transform: GeoTransform) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(DemError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            transform,
            nodata: None,
        })
    }

    /// Create a raster where every sample is computed from its `(row, col)`.
    pub fn from_fn(
        width: u32,
        height: u32,
        transform: GeoTransform,
        mut f: impl FnMut(u32, u32) -> f32,
    ) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            data,
            width,
            height,
            transform,
            nodata: None,
        }
    }

    /// Set the no-data sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    /// Overwrite one sample.
    pub fn set(&mut self, row: u32, col: u32, value: f32) {
        let idx = row as usize * self.width as usize + col as usize;
        self.data[idx] = value;
    }
}

impl RasterSource for MemoryRaster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn geo_transform(&self) -> &GeoTransform {
        &self.transform
    }

    fn read_window(&mut self, window: PixelWindow) -> Result<Grid> {
        check_window(window, self.width, self.height)?;

        let mut grid = Grid::filled(window.height as usize, window.width as usize, 0.0);
        for r in 0..window.height as usize {
            let start = (window.row_off as usize + r) * self.width as usize + window.col_off as usize;
            let src = &self.data[start..start + window.width as usize];
            for (c, &value) in src.iter().enumerate() {
                grid.set(r, c, value);
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster() -> MemoryRaster {
        let transform = GeoTransform::north_up(0.0, 10.0, 1.0, 1.0).unwrap();
        MemoryRaster::from_fn(10, 10, transform, |row, col| (row * 100 + col) as f32)
    }

    #[test]
    fn test_read_window() {
        let mut raster = raster();
        let grid = raster.read_window(PixelWindow::new(2, 3, 4, 2)).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.get(0, 0), Some(302.0));
        assert_eq!(grid.get(1, 3), Some(405.0));
    }

    #[test]
    fn test_read_window_out_of_bounds() {
        let mut raster = raster();
        let err = raster.read_window(PixelWindow::new(8, 0, 4, 4)).unwrap_err();
        assert!(matches!(err, DemError::WindowOutOfBounds { .. }));
    }

    #[test]
    fn test_read_empty_window() {
        let mut raster = raster();
        let grid = raster.read_window(PixelWindow::new(10, 10, 0, 0)).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let transform = GeoTransform::north_up(0.0, 0.0, 1.0, 1.0).unwrap();
        let err = MemoryRaster::new(3, 3, vec![0.0; 8], transform).unwrap_err();
        assert!(matches!(
            err,
            DemError::DimensionMismatch {
                expected: 9,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_index_uses_transform() {
        let raster = raster();
        assert_eq!(raster.index(2.5, 6.5), (3, 2));
    }
}
