//! Single-band GeoTIFF raster source.

use crate::source::check_window;
use crate::{DemError, GeoTransform, Grid, PixelWindow, RasterSource, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::debug;

/// GeoTIFF tag codes read by this module.
pub mod tags {
    /// ModelPixelScaleTag.
    pub const MODEL_PIXEL_SCALE: u16 = 33550;
    /// ModelTiepointTag.
    pub const MODEL_TIEPOINT: u16 = 33922;
    /// ModelTransformationTag.
    pub const MODEL_TRANSFORMATION: u16 = 34264;
    /// GeoKeyDirectoryTag.
    pub const GEO_KEY_DIRECTORY: u16 = 34735;
    /// GDAL_NODATA, stored as an ASCII string.
    pub const GDAL_NODATA: u16 = 42113;
}

const GT_RASTER_TYPE_GEO_KEY: u32 = 1025;
const RASTER_PIXEL_IS_POINT: u32 = 2;

fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// An open GeoTIFF elevation raster.
///
/// Only the header is decoded on open; samples are decoded per window, one
/// strip or tile at a time.
pub struct GeoTiffSource {
    decoder: Decoder<BufReader<File>>,
    path: PathBuf,
    width: u32,
    height: u32,
    transform: GeoTransform,
    nodata: Option<f64>,
}

impl std::fmt::Debug for GeoTiffSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoTiffSource")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .field("nodata", &self.nodata)
            .finish()
    }
}

impl GeoTiffSource {
    /// Open a GeoTIFF file.
    ///
    /// A missing file is reported as [`DemError::NotFound`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DemError::NotFound(path.to_path_buf()));
        }
        let file = BufReader::new(File::open(path)?);
        let mut decoder = Decoder::new(file)?;

        // Strips of wide SRTM/3DEP rasters exceed the default limits
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 512 * 1024 * 1024;
        limits.intermediate_buffer_size = 512 * 1024 * 1024;
        limits.ifd_value_size = 64 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        match decoder.colortype()? {
            ColorType::Gray(_) => {}
            other => {
                return Err(DemError::UnsupportedDataType(format!(
                    "expected a single-band raster, found {other:?}"
                )))
            }
        }

        let (width, height) = decoder.dimensions()?;
        let transform = Self::read_geotransform(&mut decoder)?;
        let nodata = Self::read_nodata_value(&mut decoder);

        debug!(
            path = %path.display(),
            width,
            height,
            ?nodata,
            "opened GeoTIFF"
        );

        Ok(Self {
            decoder,
            path: path.to_path_buf(),
            width,
            height,
            transform,
            nodata,
        })
    }

    /// Path the raster was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the affine geo-transform from GeoTIFF tags.
    ///
    /// `ModelTransformation` wins over `ModelTiepoint` + `ModelPixelScale`.
    fn read_geotransform<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<GeoTransform> {
        let transform = if let Ok(matrix) = decoder.get_tag_f64_vec(tag(tags::MODEL_TRANSFORMATION)) {
            GeoTransform::from_model_transformation(&matrix)?
        } else {
            let tiepoint = decoder.get_tag_f64_vec(tag(tags::MODEL_TIEPOINT));
            let pixel_scale = decoder.get_tag_f64_vec(tag(tags::MODEL_PIXEL_SCALE));
            match (tiepoint, pixel_scale) {
                (Ok(tiepoint), Ok(scale)) => GeoTransform::from_tiepoint_and_scale(&tiepoint, &scale)?,
                _ => {
                    return Err(DemError::InvalidGeoTiff(
                        "no ModelTransformation or ModelTiepoint/ModelPixelScale tags".to_string(),
                    ))
                }
            }
        };

        if Self::is_pixel_is_point(decoder) {
            Ok(transform.shifted_half_pixel())
        } else {
            Ok(transform)
        }
    }

    /// Whether the GeoKey directory declares `RasterPixelIsPoint`.
    fn is_pixel_is_point<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> bool {
        let Ok(keys) = decoder.get_tag_u32_vec(tag(tags::GEO_KEY_DIRECTORY)) else {
            return false;
        };
        // Header is [version, revision, minor, key count], then 4 values per key:
        // [key id, tag location, count, value]. Location 0 means the value is inline.
        keys.get(4..)
            .unwrap_or_default()
            .chunks_exact(4)
            .any(|key| key[0] == GT_RASTER_TYPE_GEO_KEY && key[1] == 0 && key[3] == RASTER_PIXEL_IS_POINT)
    }

    /// Try to read the no-data value from the GDAL_NODATA tag.
    fn read_nodata_value<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
        let text = decoder.get_tag_ascii_string(tag(tags::GDAL_NODATA)).ok()?;
        text.trim_matches(|c: char| c.is_whitespace() || c == '\0')
            .parse()
            .ok()
    }

    /// Convert any decoded sample type to `f32`.
    fn decode_samples(result: DecodingResult) -> Vec<f32> {
        match result {
            DecodingResult::F32(data) => data,
            DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        }
    }
}

impl RasterSource for GeoTiffSource {
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

        let mut grid = Grid::filled(window.height as usize, window.width as usize, f32::NAN);
        if window.is_empty() {
            return Ok(grid);
        }

        // Strips are chunks as wide as the image, tiles are a regular lattice.
        let (chunk_w, chunk_h) = self.decoder.chunk_dimensions();
        let chunks_across = self.width.div_ceil(chunk_w);
        let win_end_col = window.end_col() as u32;
        let win_end_row = window.end_row() as u32;

        for chunk_row in window.row_off / chunk_h..=(win_end_row - 1) / chunk_h {
            for chunk_col in window.col_off / chunk_w..=(win_end_col - 1) / chunk_w {
                let index = chunk_row * chunks_across + chunk_col;
                let (data_w, data_h) = self.decoder.chunk_data_dimensions(index);
                let samples = Self::decode_samples(self.decoder.read_chunk(index)?);

                let top = chunk_row * chunk_h;
                let left = chunk_col * chunk_w;
                let rows = window.row_off.max(top)..win_end_row.min(top + data_h);
                let cols = window.col_off.max(left)..win_end_col.min(left + data_w);

                for row in rows {
                    for col in cols.clone() {
                        let offset = (row - top) as usize * data_w as usize + (col - left) as usize;
                        let value = *samples.get(offset).ok_or_else(|| {
                            DemError::InvalidGeoTiff(format!(
                                "chunk {index} holds {} samples, expected at least {}",
                                samples.len(),
                                offset + 1
                            ))
                        })?;
                        grid.set(
                            (row - window.row_off) as usize,
                            (col - window.col_off) as usize,
                            value,
                        );
                    }
                }
            }
        }

        debug!(?window, "read window");
        Ok(grid)
    }
}
