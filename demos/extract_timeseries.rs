//! Walks through the RuZonal library API end to end.
//!
//! Expects the files produced by the `create_sample_data` example in the
//! current directory; run that one first.

use std::path::Path;

use ru_zonal::prelude::*;

fn main() -> Result<()> {
    let cube_path = Path::new("sample_cube.nc");
    let zones_path = Path::new("zones.geojson");

    if !cube_path.exists() || !zones_path.exists() {
        eprintln!("⚠ Sample inputs not found; run `cargo run --example create_sample_data` first");
        return Ok(());
    }

    // Load both inputs through the library API
    let cube = RasterCube::from_netcdf(cube_path, Some("ndvi"))?;
    let (nt, ny, nx) = cube.shape();
    println!(
        "📊 Cube '{}': {} time steps on a {}x{} grid",
        cube.name, nt, ny, nx
    );

    let polygons = PolygonLayer::from_geojson_file(zones_path, "name")?;
    println!(
        "🗺  Layer: {} zones in EPSG:{} ({})",
        polygons.len(),
        polygons.epsg,
        polygons.labels().join(", ")
    );

    // Median shrugs off the cloudy NaN patches better than the mean
    let options = ZonalOptions {
        statistic: ZonalStatistic::Median,
        export_csv: true,
        export_netcdf: true,
        export_plot: true,
        ..Default::default()
    };

    let table = zonal_timeseries(&cube, &polygons, Path::new("results"), &options)?;

    println!("\nZonal {} per zone (first 6 time steps):", table.statistic);
    for (i, label) in table.labels.iter().enumerate() {
        let series: Vec<String> = table
            .values
            .row(i)
            .iter()
            .take(6)
            .map(|v| format!("{:.3}", v))
            .collect();
        println!("   {}: {} ...", label, series.join(", "));
    }

    println!("\n✅ Exports written to ./results");
    Ok(())
}
