//! No-data masking and mean filling.

use crate::{PatchError, Result};
use terrapatch_dem::Grid;

/// A grid with every missing cell filled, and its value range.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedGrid {
    /// Grid without non-finite or sentinel cells.
    pub grid: Grid,
    /// Minimum and maximum cell, `None` for an empty grid.
    pub range: Option<(f32, f32)>,
    /// Number of cells that were filled.
    pub filled: usize,
}

/// Whether a cell is missing: NaN, infinite, or equal to the sentinel.
///
/// Cells are single precision, so the sentinel is rounded to `f32` before
/// comparing. A GDAL_NODATA string such as `-3.40282346639e+038` parses
/// to an `f64` that no `f32` equals, but rounds to `f32::MIN`.
pub fn is_missing(value: f32, nodata: Option<f64>) -> bool {
    !value.is_finite() || nodata.is_some_and(|nodata| value == nodata as f32)
}

/// Replace missing cells with the mean of the valid cells.
///
/// Every missing cell gets the same value: the arithmetic mean of all
/// non-missing cells in `raw`, accumulated in `f64` and stored as `f32`.
/// A grid without missing cells is returned unchanged. The range is
/// computed after filling.
///
/// Fails with [`PatchError::AllMissing`] when a non-empty grid has no
/// valid cell to average.
pub fn sanitize(mut raw: Grid, nodata: Option<f64>) -> Result<SanitizedGrid> {
    // Finite cells only, so the mean is finite too.
    let mut sum = 0.0f64;
    let mut valid = 0usize;
    for &value in raw.iter() {
        if !is_missing(value, nodata) {
            sum += f64::from(value);
            valid += 1;
        }
    }

    let cells = raw.rows() * raw.cols();
    let missing = cells - valid;
    if missing > 0 {
        if valid == 0 {
            return Err(PatchError::AllMissing { cells });
        }
        let fill = (sum / valid as f64) as f32;
        for value in raw.iter_mut() {
            if is_missing(*value, nodata) {
                *value = fill;
            }
        }
    }

    let range = raw.iter().fold(None, |range, &v| match range {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f32::min(lo, v), f32::max(hi, v))),
    });

    Ok(SanitizedGrid {
        grid: raw,
        range,
        filled: missing,
    })
}
