//! Defines command-line interface options using `clap` for the RuZonal application.

use clap::Parser;
use std::path::PathBuf;

use crate::zonal::ZonalStatistic;

/// A CLI tool for extracting zonal-statistics time series from NetCDF files
#[derive(Parser, Debug)]
#[command(
    version = "0.2.0",
    name = "RuZonal",
    about = "App for extracting zonal statistics time series from NetCDF raster cubes"
)]
pub struct Args {
    /// Path to the NetCDF file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Data variable to read; auto-detected when the file has exactly one 3-D variable
    #[arg(long)]
    pub variable: Option<String>,

    /// Path to a GeoJSON FeatureCollection of zone polygons
    #[arg(short, long)]
    pub polygons: Option<PathBuf>,

    /// Feature property used to label each polygon
    #[arg(short, long)]
    pub label: Option<String>,

    /// Statistic to extract per zone and time step
    #[arg(short, long, default_value = "mean", value_parser = parse_stat_arg)]
    pub stat: ZonalStatistic,

    /// Directory receiving exported results
    #[arg(short, long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Export the result table as <stat>.csv
    #[arg(long)]
    pub csv: bool,

    /// Export the result table as zonalstats_<stat>.nc
    #[arg(long)]
    pub netcdf: bool,

    /// Export one <label>_<stat>.png plot per polygon
    #[arg(long)]
    pub plot: bool,

    /// Number of time steps per parallel work unit
    #[arg(long, default_value_t = 20)]
    pub chunk_size: usize,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// List all variables and dimensions in the NetCDF file
    #[arg(long)]
    pub list_vars: bool,

    /// Describe a specific variable (data type, shape, and attributes)
    #[arg(long)]
    pub describe: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn parse_stat_arg(s: &str) -> Result<ZonalStatistic, String> {
    ZonalStatistic::from_name(s).map_err(|e| e.to_string())
}
