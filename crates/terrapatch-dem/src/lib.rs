//! # terrapatch-dem
//!
//! Single-band elevation rasters with affine geo-referencing and windowed
//! reads.
//!
//! ## Overview
//!
//! [`RasterSource`] is the contract the patch extractor reads through: the
//! raster's pixel dimensions, an optional no-data sentinel, the
//! [`GeoTransform`] mapping pixels to geographic coordinates, and
//! [`RasterSource::read_window`] returning the samples of a [`PixelWindow`]
//! as an `f32` [`Grid`].
//!
//! Two implementations are provided:
//! - [`GeoTiffSource`] reads GeoTIFF files (SRTM, 3DEP and friends). Only the
//!   strips or tiles that intersect a window are decoded.
//! - [`MemoryRaster`] holds samples in memory, for tools and tests.
//!
//! ## Example
//!
//! ```no_run
//! use terrapatch_dem::{GeoTiffSource, PixelWindow, RasterSource};
//!
//! let mut source = GeoTiffSource::open("data/output_SRTMGL1.tif")?;
//! let (row, col) = source.index(29.0, 41.0);
//! println!("pixel ({row}, {col}) of {}x{}", source.width(), source.height());
//!
//! let grid = source.read_window(PixelWindow::new(0, 0, 16, 16))?;
//! println!("first sample: {:?}", grid.get(0, 0));
//! # Ok::<(), terrapatch_dem::DemError>(())
//! ```

mod error;
mod geotiff;
mod source;
mod transform;
mod window;

pub use error::DemError;
pub use geotiff::{tags, GeoTiffSource};
pub use source::{MemoryRaster, RasterSource};
pub use transform::{GeoBounds, GeoTransform};
pub use window::{Grid, PixelWindow};

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, DemError>;
