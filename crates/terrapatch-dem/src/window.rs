//! Pixel windows and the row-major grids read from them.
//!
//! Window coordinates are in pixels with `(0, 0)` at the top-left corner
//! of the raster; rows grow downward and columns grow rightward.

/// Rectangular area of a raster in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    /// Column of the left edge.
    pub col_off: u32,
    /// Row of the top edge.
    pub row_off: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelWindow {
    /// Create a new window.
    pub fn new(col_off: u32, row_off: u32, width: u32, height: u32) -> Self {
        Self {
            col_off,
            row_off,
            width,
            height,
        }
    }

    /// Window covering a whole raster.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Column immediately right of the window (exclusive).
    pub fn end_col(&self) -> u64 {
        self.col_off as u64 + self.width as u64
    }

    /// Row immediately below the window (exclusive).
    pub fn end_row(&self) -> u64 {
        self.row_off as u64 + self.height as u64
    }

    /// Whether the window has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels in the window.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the window lies entirely inside a `width` x `height` raster.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.end_col() <= width as u64 && self.end_row() <= height as u64
    }

    /// Overlap of two windows.
    ///
    /// Disjoint windows give a zero-sized window anchored at the clamped
    /// offsets rather than an error.
    pub fn intersection(&self, other: &PixelWindow) -> PixelWindow {
        let col_start = self.col_off.max(other.col_off);
        let row_start = self.row_off.max(other.row_off);
        let col_end = self.end_col().min(other.end_col());
        let row_end = self.end_row().min(other.end_row());

        PixelWindow {
            col_off: col_start,
            row_off: row_start,
            width: col_end.saturating_sub(col_start as u64) as u32,
            height: row_end.saturating_sub(row_start as u64) as u32,
        }
    }
}

/// Row-major grid of single-precision samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Grid of the given shape filled with one value.
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Wrap a row-major buffer; `None` if its length does not match.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { data, rows, cols })
    }

    /// Build from nested rows; `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        let data = rows.into_iter().flatten().collect();
        Some(Self {
            data,
            rows: n_rows,
            cols,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, if inside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.data.iter()
    }

    /// Mutable cells in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.data.iter_mut()
    }

    /// Row-major samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Iterate over rows.
    pub fn row_slices(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    /// Nested `Vec` of rows, the shape sent to clients.
    pub fn to_nested(&self) -> Vec<Vec<f32>> {
        self.row_slices().map(<[f32]>::to_vec).collect()
    }
}
