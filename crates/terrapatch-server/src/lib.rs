//! # terrapatch-server
//!
//! HTTP front end and command line tools for `terrapatch-patch`.
//!
//! `GET /terrain?lat=<deg>&lon=<deg>&n=<16..512>` answers with a
//! [`TerrainResponse`]; failures answer with an [`ErrorBody`] and a
//! non-2xx status. The raster is opened anew for every request on the
//! blocking thread pool.

pub mod config;
mod error;
mod handlers;
mod response;

pub use config::{Cli, Command, ServerConfig};
pub use error::{ApiError, ServerError};
pub use handlers::{router, TerrainParams};
pub use response::{ErrorBody, TerrainResponse};

use config::{InfoArgs, PatchArgs};
use std::io::Write;
use terrapatch_dem::{GeoTiffSource, RasterSource};
use terrapatch_patch::{PatchExtractor, PatchQuery};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Result type for service commands.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Run the HTTP service until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    if !config.dem_path.exists() {
        warn!(
            dem = %config.dem_path.display(),
            "raster not found; /terrain will answer 503 until it appears"
        );
    }

    let app = router(PatchExtractor::from_path(&config.dem_path));
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    info!(
        addr = %listener.local_addr()?,
        dem = %config.dem_path.display(),
        "terrain service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("terrain service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Extract one patch and write it as JSON to `out`.
pub fn write_patch<W: Write>(args: &PatchArgs, out: &mut W) -> Result<()> {
    let query = PatchQuery::new(args.lat, args.lon, args.n)?;
    let patch = PatchExtractor::from_path(&args.dem).extract(&query)?;
    let response = TerrainResponse::from(&patch);

    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &response)?;
    } else {
        serde_json::to_writer(&mut *out, &response)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Describe a raster: size, no-data value, transform and extent.
pub fn write_info<W: Write>(args: &InfoArgs, out: &mut W) -> Result<()> {
    let source = GeoTiffSource::open(&args.dem)?;
    let transform = source.geo_transform();
    let bounds = transform.bounds(source.width(), source.height());

    writeln!(out, "File: {}", source.path().display())?;
    writeln!(out, "Size: {} x {} pixels", source.width(), source.height())?;
    match source.nodata() {
        Some(nodata) => writeln!(out, "No-data: {nodata}")?,
        None => writeln!(out, "No-data: none")?,
    }
    writeln!(
        out,
        "Origin: ({:.8}, {:.8}), pixel size: {:.10} x {:.10}",
        transform.origin_x, transform.origin_y, transform.pixel_width, transform.pixel_height
    )?;
    writeln!(
        out,
        "Extent: lat {:.6} to {:.6}, lon {:.6} to {:.6}",
        bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
    )?;
    Ok(())
}
