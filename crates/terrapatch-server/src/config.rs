//! Command line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use terrapatch_patch::DEFAULT_PATCH_SIZE;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8010";

/// Serve square elevation patches cut from a GeoTIFF DEM.
#[derive(Parser, Debug)]
#[command(name = "terrapatch", version, about, long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "info", "terrapatch_patch=debug").
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Extract one patch and print it as JSON.
    Patch(PatchArgs),
    /// Print raster dimensions, no-data value and extent.
    Info(InfoArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// GeoTIFF elevation raster.
    #[arg(long, env = "TERRAPATCH_DEM")]
    pub dem: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "TERRAPATCH_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,
}

#[derive(Args, Debug, Clone)]
pub struct PatchArgs {
    /// GeoTIFF elevation raster.
    #[arg(long, env = "TERRAPATCH_DEM")]
    pub dem: PathBuf,

    /// Center latitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Center longitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Patch edge length in pixels (16-512).
    #[arg(short, long, default_value_t = DEFAULT_PATCH_SIZE)]
    pub n: u32,

    /// Pretty-print the JSON.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// GeoTIFF elevation raster.
    #[arg(long, env = "TERRAPATCH_DEM")]
    pub dem: PathBuf,
}

/// Settings the HTTP service runs with.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Raster served by `/terrain`.
    pub dem_path: PathBuf,
    /// Listen address.
    pub bind: SocketAddr,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            dem_path: args.dem,
            bind: args.bind,
        }
    }
}
