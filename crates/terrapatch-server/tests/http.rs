//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::fs::File;
use std::path::Path;
use terrapatch_dem::{tags, GeoTransform, MemoryRaster};
use terrapatch_patch::PatchExtractor;
use terrapatch_server::config::PatchArgs;
use terrapatch_server::{router, write_patch, ErrorBody, TerrainResponse};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tower::ServiceExt;

const NODATA: f64 = -9999.0;
const RES: f64 = 1.0 / 1024.0;

/// 1000x1000 raster with the corner of pixel (500, 500) at (41.0, 29.0).
fn transform() -> GeoTransform {
    GeoTransform::north_up(29.0 - 500.0 * RES, 41.0 + 500.0 * RES, RES, RES).unwrap()
}

fn memory_app(fill: fn(u32, u32) -> f32) -> Router {
    let raster = MemoryRaster::from_fn(1000, 1000, transform(), fill).with_nodata(NODATA);
    router(PatchExtractor::new(move || -> terrapatch_dem::Result<MemoryRaster> {
        Ok(raster.clone())
    }))
}

fn app() -> Router {
    memory_app(|row, col| (row + col) as f32)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn get_error(app: Router, uri: &str, expected: StatusCode) -> String {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, expected, "{}", String::from_utf8_lossy(&body));
    let body: ErrorBody = serde_json::from_slice(&body).expect("error body");
    body.error
}

#[tokio::test]
async fn test_terrain_inside() {
    let (status, body) = get(app(), "/terrain?lat=41.0&lon=29.0&n=16").await;
    assert_eq!(status, StatusCode::OK);

    let patch: TerrainResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(patch.n, 16);
    assert_eq!((patch.rows, patch.cols), (16, 16));
    assert_eq!(patch.elevation.len(), 16);
    assert!(patch.elevation.iter().all(|row| row.len() == 16));
    // Window starts at pixel (492, 492).
    assert_eq!(patch.elevation[0][0], 984.0);
    assert_eq!(patch.min, 984.0);
    assert_eq!(patch.max, 1014.0);
}

#[tokio::test]
async fn test_terrain_default_size() {
    let (status, body) = get(app(), "/terrain?lat=41.0&lon=29.0").await;
    assert_eq!(status, StatusCode::OK);
    let patch: TerrainResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!((patch.rows, patch.cols), (128, 128));
}

#[tokio::test]
async fn test_terrain_clipped_near_edge() {
    // Center of pixel (5, 5).
    let lat = 41.0 + 494.5 * RES;
    let lon = 29.0 - 494.5 * RES;
    let (status, body) = get(app(), &format!("/terrain?lat={lat}&lon={lon}&n=16")).await;
    assert_eq!(status, StatusCode::OK);
    let patch: TerrainResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!((patch.n, patch.rows, patch.cols), (13, 13, 13));
}

#[tokio::test]
async fn test_terrain_validation() {
    let err = get_error(app(), "/terrain?lon=29.0", StatusCode::BAD_REQUEST).await;
    assert!(err.contains("lat"));

    let err = get_error(app(), "/terrain?lat=41.0", StatusCode::BAD_REQUEST).await;
    assert!(err.contains("lon"));

    let err = get_error(app(), "/terrain?lat=41.0&lon=29.0&n=8", StatusCode::BAD_REQUEST).await;
    assert!(err.contains("between 16 and 512"));

    get_error(app(), "/terrain?lat=41.0&lon=29.0&n=513", StatusCode::BAD_REQUEST).await;
    get_error(app(), "/terrain?lat=north&lon=29.0", StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn test_terrain_outside_raster() {
    let err = get_error(app(), "/terrain?lat=80.0&lon=-100.0&n=128", StatusCode::NOT_FOUND).await;
    assert!(err.contains("No raster coverage"));
}

#[tokio::test]
async fn test_terrain_all_nodata() {
    let app = memory_app(|_, _| NODATA as f32);
    let err = get_error(app, "/terrain?lat=41.0&lon=29.0&n=32", StatusCode::UNPROCESSABLE_ENTITY).await;
    assert!(err.contains("no-data"));
}

#[tokio::test]
async fn test_terrain_missing_raster() {
    let app = router(PatchExtractor::from_path("/no/such/dem.tif"));
    let err = get_error(app, "/terrain?lat=41.0&lon=29.0", StatusCode::SERVICE_UNAVAILABLE).await;
    assert!(err.contains("/no/such/dem.tif"));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/terrain?lat=41.0&lon=29.0&n=16")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

/// 64x64 raster whose cell (0, 0) holds `nodata` rounded to `f32`.
fn write_geotiff(path: &Path, nodata: &str) {
    let file = File::create(path).unwrap();
    let mut tiff = TiffEncoder::new(file).unwrap();
    let mut image = tiff.new_image::<colortype::Gray32Float>(64, 64).unwrap();
    image
        .encoder()
        .write_tag(
            Tag::from_u16_exhaustive(tags::MODEL_TIEPOINT),
            &[0.0, 0.0, 0.0, 29.0, 41.0, 0.0][..],
        )
        .unwrap();
    image
        .encoder()
        .write_tag(
            Tag::from_u16_exhaustive(tags::MODEL_PIXEL_SCALE),
            &[0.0625, 0.0625, 0.0][..],
        )
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(tags::GDAL_NODATA), nodata)
        .unwrap();

    let mut data: Vec<f32> = (0..64 * 64).map(|i| (i % 50) as f32).collect();
    data[0] = nodata.parse::<f64>().unwrap() as f32;
    image.write_data(&data).unwrap();
}

#[tokio::test]
async fn test_terrain_from_geotiff() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.tif");
    write_geotiff(&path, "-9999");

    // Center of pixel (2, 2): the window is clamped to [0, 10) on both axes.
    let lat = 41.0 - 2.5 * 0.0625;
    let lon = 29.0 + 2.5 * 0.0625;
    let (status, body) = get(router(PatchExtractor::from_path(&path)), &format!("/terrain?lat={lat}&lon={lon}&n=16")).await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));

    let patch: TerrainResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!((patch.rows, patch.cols), (10, 10));
    assert!(patch.elevation.iter().flatten().all(|&v| f64::from(v) != NODATA));
    assert!(patch.min >= 0.0);
}

#[tokio::test]
async fn test_terrain_float32_min_nodata_filled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.tif");
    write_geotiff(&path, "-3.40282346639e+038");

    // Center of pixel (2, 2), window [0, 10) on both axes.
    let lat = 41.0 - 2.5 * 0.0625;
    let lon = 29.0 + 2.5 * 0.0625;
    let (status, body) = get(router(PatchExtractor::from_path(&path)), &format!("/terrain?lat={lat}&lon={lon}&n=16")).await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));

    let patch: TerrainResponse = serde_json::from_slice(&body).unwrap();
    assert!(patch.elevation.iter().flatten().all(|&v| v != f32::MIN));
    assert!(patch.min >= 0.0);
    assert!(patch.elevation[0][0] > 0.0);
}

#[test]
fn test_write_patch_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.tif");
    write_geotiff(&path, "-9999");

    let args = PatchArgs {
        dem: path,
        lat: 41.0 - 32.5 * 0.0625,
        lon: 29.0 + 32.5 * 0.0625,
        n: 16,
        pretty: false,
    };
    let mut out = Vec::new();
    write_patch(&args, &mut out).unwrap();

    let patch: TerrainResponse = serde_json::from_slice(&out).unwrap();
    assert_eq!((patch.rows, patch.cols), (16, 16));
}
