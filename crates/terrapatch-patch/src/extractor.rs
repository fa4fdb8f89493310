//! The patch extractor: map, clip, read, sanitize.

use crate::sanitize::sanitize;
use crate::window::{clip_window, map_to_pixel};
use crate::{PatchError, PatchQuery, Result};
use std::path::{Path, PathBuf};
use terrapatch_dem::{GeoTiffSource, Grid, PixelWindow, RasterSource};
use tracing::debug;

/// A sanitized elevation patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationPatch {
    /// Elevation samples, row-major, north row first.
    pub elevation: Grid,
    /// Smallest sample after filling.
    pub min: f32,
    /// Largest sample after filling.
    pub max: f32,
    /// Raster window the samples were read from.
    pub window: PixelWindow,
    /// Pixel `(row, col)` the query coordinate mapped to.
    pub center: (i64, i64),
    /// Number of no-data cells replaced by the window mean.
    pub filled: usize,
}

impl ElevationPatch {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.elevation.rows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.elevation.cols()
    }
}

/// Extract a patch from an already open raster.
pub fn extract_patch<S: RasterSource + ?Sized>(source: &mut S, query: &PatchQuery) -> Result<ElevationPatch> {
    let (row, col) = map_to_pixel(source, query.lat(), query.lon());
    let window = clip_window(row, col, query.size(), source.width(), source.height());
    debug!(row, col, ?window, "mapped query to window");

    if window.is_empty() {
        return Err(PatchError::EmptyWindow {
            row,
            col,
            size: query.size(),
        });
    }

    let raw = source.read_window(window)?;
    let clean = sanitize(raw, source.nodata())?;
    let (min, max) = clean.range.ok_or(PatchError::EmptyWindow {
        row,
        col,
        size: query.size(),
    })?;

    if clean.filled > 0 {
        debug!(filled = clean.filled, "filled no-data cells with window mean");
    }

    Ok(ElevationPatch {
        elevation: clean.grid,
        min,
        max,
        window,
        center: (row, col),
        filled: clean.filled,
    })
}

/// Something that can open a fresh raster handle for one request.
pub trait OpenRaster: Send + Sync {
    /// Raster type produced.
    type Source: RasterSource;

    /// Open the raster.
    fn open(&self) -> terrapatch_dem::Result<Self::Source>;
}

impl<F, S> OpenRaster for F
where
    F: Fn() -> terrapatch_dem::Result<S> + Send + Sync,
    S: RasterSource,
{
    type Source = S;

    fn open(&self) -> terrapatch_dem::Result<S> {
        self()
    }
}

/// Opens a GeoTIFF file from a fixed path.
#[derive(Debug, Clone)]
pub struct GeoTiffFile {
    path: PathBuf,
}

impl GeoTiffFile {
    /// Raster at `path`; the file is not touched until the first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Configured path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OpenRaster for GeoTiffFile {
    type Source = GeoTiffSource;

    fn open(&self) -> terrapatch_dem::Result<GeoTiffSource> {
        GeoTiffSource::open(&self.path)
    }
}

/// Extracts patches, opening the raster anew for every request.
#[derive(Debug, Clone)]
pub struct PatchExtractor<O> {
    opener: O,
}

impl PatchExtractor<GeoTiffFile> {
    /// Extractor reading the GeoTIFF at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(GeoTiffFile::new(path))
    }
}

impl<O: OpenRaster> PatchExtractor<O> {
    /// Extractor using a custom raster opener.
    pub fn new(opener: O) -> Self {
        Self { opener }
    }

    /// The raster opener.
    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Open the raster and extract the patch for `query`.
    pub fn extract(&self, query: &PatchQuery) -> Result<ElevationPatch> {
        let mut source = self.opener.open()?;
        extract_patch(&mut source, query)
    }
}
