//! Zonal-statistics time series extraction pipeline
//!
//! Ties the pieces together: reproject the polygon layer to the cube's
//! CRS, rasterize each polygon once, reduce every time slice in parallel
//! chunks, and assemble a polygon-by-time table that is optionally
//! exported as CSV, NetCDF, and per-zone plots.

use std::fs;
use std::ops::Range;
use std::path::Path;

use ndarray::{s, Array2};
use rayon::prelude::*;

use crate::errors::Result;
use crate::netcdf_io::write_table_to_netcdf;
use crate::plot::write_series_plots;
use crate::raster::RasterCube;
use crate::table::StatTable;
use crate::vector::PolygonLayer;
use crate::zonal::{rasterize_zone, slice_statistic, ZonalStatistic, ZoneMask};

/// Options controlling extraction and export.
#[derive(Debug, Clone)]
pub struct ZonalOptions {
    /// Statistic to extract per zone and time step.
    pub statistic: ZonalStatistic,
    /// Number of time steps handed to each parallel work unit.
    ///
    /// Purely a scheduling knob: results are identical for every chunk
    /// size.
    pub chunk_size: usize,
    /// Write `<stat>.csv` into the results directory.
    pub export_csv: bool,
    /// Write `zonalstats_<stat>.nc` into the results directory.
    pub export_netcdf: bool,
    /// Write one `<label>_<stat>.png` per zone into the results directory.
    pub export_plot: bool,
}

impl Default for ZonalOptions {
    fn default() -> Self {
        ZonalOptions {
            statistic: ZonalStatistic::Mean,
            chunk_size: 20,
            export_csv: false,
            export_netcdf: false,
            export_plot: false,
        }
    }
}

/// Extracts a zonal-statistics time series from a cube over a polygon layer.
///
/// The polygon layer is reprojected (on a copy) to the cube's CRS, so the
/// cube must carry a parseable `crs` attribute. Zone masks are built once
/// and reused for every time step. Requested exports land in
/// `results_dir`, which is created if missing.
///
/// Returns the assembled table with one row per polygon (layer order) and
/// one column per time step.
pub fn zonal_timeseries(
    cube: &RasterCube,
    polygons: &PolygonLayer,
    results_dir: &Path,
    options: &ZonalOptions,
) -> Result<StatTable> {
    let (nt, ny, nx) = cube.shape();
    let target_epsg = cube.epsg()?;
    let gt = cube.geo_transform()?;

    println!(
        "🚀 Extracting zonal {} for {} polygons over {} time steps",
        options.statistic,
        polygons.len(),
        nt
    );
    if polygons.is_empty() {
        println!("⚠ Polygon layer is empty; the result table will have no rows");
    }

    let mut layer = polygons.clone();
    if layer.epsg != target_epsg {
        println!(
            "⚡ Reprojecting {} polygons from EPSG:{} to EPSG:{}",
            layer.len(),
            layer.epsg,
            target_epsg
        );
        layer.reproject(target_epsg)?;
    }

    let masks: Vec<ZoneMask> = layer
        .features
        .par_iter()
        .map(|feature| rasterize_zone(&feature.geometry, &gt, ny, nx))
        .collect::<Result<Vec<_>>>()?;

    let covered: usize = masks.iter().map(ZoneMask::len).sum();
    println!("⚡ Rasterized {} zones covering {} cells", masks.len(), covered);

    let ranges = chunk_ranges(nt, options.chunk_size);
    println!(
        "⚡ Computing zonal {} across {} chunks using parallel processing",
        options.statistic,
        ranges.len()
    );

    // One (chunk_len, n_zones) block per chunk, computed independently;
    // indexed collect keeps chunk order, so assembly is deterministic
    let n_zones = masks.len();
    let blocks: Vec<Array2<f64>> = ranges
        .par_iter()
        .map(|range| {
            let mut block = Array2::from_elem((range.len(), n_zones), f64::NAN);
            for (local_t, t) in range.clone().enumerate() {
                let slice = cube.slice(t);
                for (zone, mask) in masks.iter().enumerate() {
                    block[[local_t, zone]] = slice_statistic(&slice, mask, options.statistic);
                }
            }
            block
        })
        .collect();

    let mut time_major = Array2::from_elem((nt, n_zones), f64::NAN);
    for (range, block) in ranges.iter().zip(blocks) {
        time_major
            .slice_mut(s![range.start..range.end, ..])
            .assign(&block);
    }

    // Zone-major, standard-layout copy for the table: one row per polygon
    let values = time_major.t().to_owned();

    let table = StatTable::new(
        options.statistic,
        &layer.label_name,
        layer.labels(),
        cube.time.clone(),
        cube.time_units.clone(),
        cube.time_labels(),
        values,
    )?;

    println!(
        "✅ Extracted {}×{} statistics table",
        table.n_zones(),
        table.n_times()
    );

    export_table(&table, results_dir, options)?;

    Ok(table)
}

/// Loads both inputs from disk and runs the extraction.
///
/// # Arguments
///
/// * `netcdf_path` - NetCDF file holding the raster cube
/// * `variable` - Data variable name, or `None` to auto-detect
/// * `geojson_path` - GeoJSON FeatureCollection of zone polygons
/// * `label_attribute` - Feature property labelling each zone
/// * `results_dir` - Directory receiving the requested exports
pub fn zonal_timeseries_from_files<P1, P2>(
    netcdf_path: P1,
    variable: Option<&str>,
    geojson_path: P2,
    label_attribute: &str,
    results_dir: &Path,
    options: &ZonalOptions,
) -> Result<StatTable>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let cube = RasterCube::from_netcdf(netcdf_path, variable)?;
    let polygons = PolygonLayer::from_geojson_file(geojson_path, label_attribute)?;
    zonal_timeseries(&cube, &polygons, results_dir, options)
}

/// Runs the exports requested in `options`.
fn export_table(table: &StatTable, results_dir: &Path, options: &ZonalOptions) -> Result<()> {
    if !(options.export_csv || options.export_netcdf || options.export_plot) {
        return Ok(());
    }

    fs::create_dir_all(results_dir)?;

    if options.export_csv {
        let path = results_dir.join(format!("{}.csv", table.statistic.name()));
        table.write_csv(&path)?;
        println!("✅ Wrote CSV: {}", path.display());
    }

    if options.export_netcdf {
        let path = results_dir.join(format!("zonalstats_{}.nc", table.statistic.name()));
        write_table_to_netcdf(table, &path)?;
        println!("✅ Wrote NetCDF: {}", path.display());
    }

    if options.export_plot {
        let written = write_series_plots(table, results_dir)?;
        println!(
            "✅ Wrote {} plots to {}",
            written.len(),
            results_dir.display()
        );
    }

    Ok(())
}

/// Splits `0..total` into consecutive ranges of at most `chunk_size`.
///
/// A zero `chunk_size` collapses to a single chunk.
pub fn chunk_ranges(total: usize, chunk_size: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    let size = if chunk_size == 0 { total } else { chunk_size };

    let mut ranges = Vec::with_capacity(total.div_ceil(size));
    let mut start = 0;
    while start < total {
        let end = (start + size).min(total);
        ranges.push(start..end);
        start = end;
    }
    ranges
}
