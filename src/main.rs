use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geo::Geometry;
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use geoshift::config::FileConfig;
use geoshift::{
    Affine, Crs, CrsGeometry, GeoVector, azimuthal_from_geometry, cut_by_antimeridian,
    cut_by_antimeridian_with_offset, transform,
};

/// Reproject vector shapes and split them at the antimeridian
///
/// Geometries are read as JSON (geo's serde representation) from a file or
/// stdin and written as JSON to stdout.
///
/// Examples:
///   # Web Mercator to WGS84
///   geoshift transform --src-crs "EPSG:3857" -i shape.json
///
///   # Pixel coordinates of a 0.5° global grid to WGS84
///   geoshift transform --src-crs "+proj=longlat +datum=WGS84 +no_defs" \
///       --src-affine "2,0,360,0,-2,180" -i pixels.json
///
///   # Split a shape at the antimeridian
///   geoshift cut --crs "+proj=longlat +datum=WGS84 +no_defs" -i shape.json
#[derive(Parser, Debug)]
#[command(name = "geoshift")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches geoshift.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reproject a shape between two CRS
    Transform {
        /// CRS of the input (proj-string or EPSG:code)
        #[arg(long)]
        src_crs: Crs,

        /// CRS of the output (defaults to the config file's, then WGS84)
        #[arg(long)]
        dst_crs: Option<Crs>,

        /// Input coordinates are relative to this affine: a,b,c,d,e,f
        #[arg(long, allow_hyphen_values = true)]
        src_affine: Option<Affine>,

        /// Output coordinates are made relative to this affine: a,b,c,d,e,f
        #[arg(long, allow_hyphen_values = true)]
        dst_affine: Option<Affine>,

        /// Input JSON file (stdin if omitted)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },

    /// Split a shape crossing the antimeridian
    Cut {
        /// CRS of the input
        #[arg(long)]
        crs: Crs,

        /// X offset for the east piece (defaults to the CRS width)
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,

        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },

    /// Azimuthal equidistant CRS centered on a shape
    Aeqd {
        /// CRS of the input
        #[arg(long)]
        crs: Crs,

        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct CrsOutput {
    crs: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (file_config, config_warnings) = match args.config {
        Some(ref path) => (Some(FileConfig::from_path(path)?), Vec::new()),
        None => FileConfig::load(),
    };
    let config = file_config.unwrap_or_default();

    let verbose = args.verbose || config.verbose;
    init_logging(verbose);
    for warning in &config_warnings {
        warn!("{}", warning);
    }
    debug!("Configuration: {:?}", config);

    match args.command {
        Command::Transform {
            src_crs,
            dst_crs,
            src_affine,
            dst_affine,
            input,
        } => {
            let shape = read_geometry(input.as_deref())?;
            let dst_crs = dst_crs.unwrap_or_else(|| config.destination_crs.clone());
            info!("Transforming {} -> {}", src_crs, dst_crs);

            let out = transform(
                &shape,
                &src_crs,
                Some(&dst_crs),
                src_affine.as_ref(),
                dst_affine.as_ref(),
            )
            .context("Failed to transform shape")?;
            write_json(&out)
        }
        Command::Cut { crs, offset, input } => {
            let vector = GeoVector::new(read_geometry(input.as_deref())?, crs);
            let cut = match offset.or(config.antimeridian_offset) {
                Some(offset) => cut_by_antimeridian_with_offset(&vector, offset),
                None => cut_by_antimeridian(&vector),
            }
            .context("Failed to cut shape at the antimeridian")?;

            if matches!(cut.shape(), Geometry::GeometryCollection(_)) {
                info!("Shape crosses the antimeridian, split into 2 pieces");
            }
            debug!("Result CRS: {}", cut.crs());
            write_json(cut.shape())
        }
        Command::Aeqd { crs, input } => {
            let vector = GeoVector::new(read_geometry(input.as_deref())?, crs);
            let aeqd = azimuthal_from_geometry(&vector)
                .context("Failed to build azimuthal projection")?;
            write_json(&CrsOutput {
                crs: aeqd.to_string(),
            })
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_geometry(input: Option<&Path>) -> Result<Geometry<f64>> {
    let contents = match input {
        Some(path) => std::fs::read_to_string(path)
            .context(format!("Failed to read input file: {:?}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&contents).context("Failed to parse geometry JSON")
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
