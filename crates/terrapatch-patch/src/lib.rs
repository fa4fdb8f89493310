//! # terrapatch-patch
//!
//! Cuts a square patch of elevation samples out of a raster around a
//! geographic coordinate.
//!
//! Extraction runs three stages per request, with no state shared between
//! requests:
//!
//! 1. [`map_to_pixel`] turns the center coordinate into a pixel
//!    `(row, col)` with the raster's affine transform, flooring fractional
//!    positions.
//! 2. [`clip_window`] builds the `n` x `n` window starting `n / 2` pixels
//!    before the center and intersects it with the raster extent. Near the
//!    raster edge the window shrinks, possibly to a rectangle.
//! 3. [`sanitize`] treats no-data and non-finite cells as missing and replaces
//!    them all with the mean of the valid cells, then takes min and max.
//!
//! A window with no overlap fails with [`PatchError::EmptyWindow`], and a
//! window without a single valid cell with [`PatchError::AllMissing`].
//!
//! ## Example
//!
//! ```no_run
//! use terrapatch_patch::{PatchExtractor, PatchQuery};
//!
//! let extractor = PatchExtractor::from_path("data/output_SRTMGL1.tif");
//! let patch = extractor.extract(&PatchQuery::new(41.0, 29.0, 128)?)?;
//! println!("{}x{} patch, {}..{} m", patch.rows(), patch.cols(), patch.min, patch.max);
//! # Ok::<(), terrapatch_patch::PatchError>(())
//! ```

mod error;
mod extractor;
mod query;
mod sanitize;
mod window;

pub use error::PatchError;
pub use extractor::{extract_patch, ElevationPatch, GeoTiffFile, OpenRaster, PatchExtractor};
pub use query::{PatchQuery, DEFAULT_PATCH_SIZE, MAX_PATCH_SIZE, MIN_PATCH_SIZE};
pub use sanitize::{is_missing, sanitize, SanitizedGrid};
pub use window::{clip_window, map_to_pixel};

/// Result type for patch extraction.
pub type Result<T> = std::result::Result<T, PatchError>;
