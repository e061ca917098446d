//! RuZonal: zonal-statistics time series from NetCDF raster cubes
//!
//! A Rust library for extracting per-polygon statistics from gridded time
//! series. Given a NetCDF variable ordered `(time, y, x)` and a GeoJSON
//! layer of labelled polygons, RuZonal reduces every time slice to one
//! number per polygon (mean, median, count, ...) and exports the result as
//! CSV, NetCDF, and per-polygon plots.
//!
//! ## Key Features
//!
//! - **Parallel Processing**: Time-axis chunks are reduced concurrently
//!   with Rayon; chunking never changes the numbers
//! - **Zonal Statistics**: count, sum, mean, median, min, max, std, range,
//!   majority, minority, and unique per polygon and time step
//! - **Reprojection**: polygon layers are reprojected to the raster's CRS
//!   with pure-Rust proj4rs, no system PROJ required
//! - **Metadata Inspection**: list and describe NetCDF variables before
//!   extracting anything
//! - **Exports**: CSV tables, CF-styled NetCDF, and PNG time-series plots
//!
//! ## Module Organization
//!
//! - [`raster`]: NetCDF raster cube loading and CF time decoding
//! - [`vector`]: GeoJSON polygon layer parsing and reprojection
//! - [`transform`]: affine georeferencing transforms
//! - [`crs`]: EPSG parsing and coordinate transformation
//! - [`zonal`]: zone rasterization and per-slice statistics
//! - [`timeseries`]: the chunked parallel extraction pipeline
//! - [`table`]: result tables and CSV export
//! - [`netcdf_io`]: NetCDF export of result tables
//! - [`plot`]: PNG time-series plots
//! - [`metadata`]: NetCDF file inspection
//! - [`parallel`]: parallel processing configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ru_zonal::prelude::*;
//! use std::path::Path;
//!
//! // Load the raster cube and the polygon layer
//! let cube = RasterCube::from_netcdf("ndvi.nc", None).unwrap();
//! let polygons = PolygonLayer::from_geojson_file("zones.geojson", "name").unwrap();
//!
//! // Extract the mean per polygon and time step, exporting a CSV
//! let options = ZonalOptions {
//!     statistic: ZonalStatistic::Mean,
//!     export_csv: true,
//!     ..Default::default()
//! };
//! let table = zonal_timeseries(&cube, &polygons, Path::new("results"), &options).unwrap();
//! println!("{} zones, {} time steps", table.n_zones(), table.n_times());
//! ```
//!
//! The library is designed to stay exact: results are identical for any
//! chunk size and thread count, and rows always follow the input layer's
//! feature order.

// Core modules
pub mod crs;
pub mod errors;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod plot;
pub mod raster;
pub mod table;
pub mod timeseries;
pub mod transform;
pub mod vector;
pub mod zonal;

// CLI definitions, shared with the binary
pub mod cli;

// Direct re-exports for the public API
pub use crs::*;
pub use errors::*;
pub use metadata::*;
pub use netcdf_io::*;
pub use parallel::*;
pub use plot::*;
pub use raster::*;
pub use table::*;
pub use timeseries::*;
pub use transform::*;
pub use vector::*;
pub use zonal::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::errors::{Result, RuZonalError};
    pub use crate::parallel::ParallelConfig;
    pub use crate::raster::RasterCube;
    pub use crate::table::StatTable;
    pub use crate::timeseries::{zonal_timeseries, zonal_timeseries_from_files, ZonalOptions};
    pub use crate::vector::{PolygonFeature, PolygonLayer};
    pub use crate::zonal::ZonalStatistic;
}
