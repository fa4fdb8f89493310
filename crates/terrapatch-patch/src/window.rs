//! Coordinate mapping and window clipping.

use terrapatch_dem::{PixelWindow, RasterSource};

/// Pixel `(row, col)` containing a geographic coordinate.
///
/// Uses the source's affine transform with floor rounding. The result is
/// not checked against the raster extent.
pub fn map_to_pixel<S: RasterSource + ?Sized>(source: &S, lat: f64, lon: f64) -> (i64, i64) {
    source.index(lon, lat)
}

/// Square `size` x `size` window centered on `(row, col)`, clipped to a
/// `width` x `height` raster.
///
/// The window starts `size / 2` pixels before the center, so for even sizes
/// the center pixel sits just right of and below the middle. Offsets are
/// clamped to the near edges and the size is cut at the far edges. A window
/// that misses the raster entirely comes back with zero width or height.
pub fn clip_window(row: i64, col: i64, size: u32, width: u32, height: u32) -> PixelWindow {
    let half = i64::from(size / 2);
    let (row_off, rows) = clip_span(row.saturating_sub(half), size, height);
    let (col_off, cols) = clip_span(col.saturating_sub(half), size, width);
    PixelWindow::new(col_off, row_off, cols, rows)
}

/// Clip `[start, start + len)` to `[0, limit)`, returning offset and length.
fn clip_span(start: i64, len: u32, limit: u32) -> (u32, u32) {
    let limit = i64::from(limit);
    let end = start.saturating_add(i64::from(len)).clamp(0, limit);
    let start = start.clamp(0, limit);
    (start as u32, (end - start).max(0) as u32)
}
