//! Creates sample input data for trying out RuZonal.
//!
//! Writes a NetCDF raster cube (`sample_cube.nc`) with a seasonal NDVI-like
//! signal on a lat/lon grid, and a GeoJSON polygon layer (`zones.geojson`)
//! with three labelled zones, ready for the zonal extraction pipeline.

use ndarray::{Array1, Array3};
use netcdf::create;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cube_path = Path::new("sample_cube.nc");
    let zones_path = Path::new("zones.geojson");

    println!("🔨 Creating sample NetCDF cube: {}", cube_path.display());

    // Remove existing file if it exists
    if cube_path.exists() {
        std::fs::remove_file(cube_path)?;
    }

    let mut file = create(cube_path)?;

    // Add global attributes
    file.add_attribute("title", "Sample vegetation index cube")?;
    file.add_attribute("created_by", "create_sample_data.rs")?;

    // Add dimensions: two years of monthly steps on a 20x20 grid
    file.add_dimension("time", 24)?;
    file.add_dimension("y", 20)?;
    file.add_dimension("x", 20)?;

    // Add coordinate variables
    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "days since 2022-01-01")?;
        time_var.put_attribute("long_name", "time")?;
        time_var.put_attribute("calendar", "standard")?;

        let time_data: Vec<f64> = (0..24).map(|i| i as f64 * 30.0).collect();
        let time_array = Array1::from(time_data);
        time_var.put(time_array.view(), ..)?;
    }

    {
        let mut y_var = file.add_variable::<f64>("y", &["y"])?;
        y_var.put_attribute("units", "degrees_north")?;
        y_var.put_attribute("long_name", "latitude")?;

        // Descending from north to south, as rasters usually are
        let y_data: Vec<f64> = (0..20).map(|i| -36.05 - i as f64 * 0.1).collect();
        let y_array = Array1::from(y_data);
        y_var.put(y_array.view(), ..)?;
    }

    {
        let mut x_var = file.add_variable::<f64>("x", &["x"])?;
        x_var.put_attribute("units", "degrees_east")?;
        x_var.put_attribute("long_name", "longitude")?;

        let x_data: Vec<f64> = (0..20).map(|i| 142.05 + i as f64 * 0.1).collect();
        let x_array = Array1::from(x_data);
        x_var.put(x_array.view(), ..)?;
    }

    // Add the NDVI data variable (time, y, x)
    {
        let mut ndvi_var = file.add_variable::<f64>("ndvi", &["time", "y", "x"])?;
        ndvi_var.put_attribute("units", "1")?;
        ndvi_var.put_attribute("long_name", "normalized difference vegetation index")?;
        ndvi_var.put_attribute("crs", "EPSG:4326")?;
        ndvi_var.put_attribute("_FillValue", f64::NAN)?;

        // Seasonal cycle plus a gentle northwest-to-southeast gradient,
        // with a cloudy patch of NaNs every sixth time step
        let mut ndvi_data = Vec::with_capacity(24 * 20 * 20);
        for time_idx in 0..24 {
            let seasonal = 0.2 * (time_idx as f64 * std::f64::consts::PI / 6.0).cos();
            for row in 0..20 {
                for col in 0..20 {
                    let gradient = 0.1 * (row + col) as f64 / 38.0;
                    let cloudy = time_idx % 6 == 0 && (2..5).contains(&row) && (2..5).contains(&col);
                    if cloudy {
                        ndvi_data.push(f64::NAN);
                    } else {
                        ndvi_data.push(0.45 + seasonal + gradient);
                    }
                }
            }
        }

        let ndvi_array = Array3::from_shape_vec((24, 20, 20), ndvi_data)?;
        ndvi_var.put(ndvi_array.view(), ..)?;
    }

    println!("🔨 Creating sample polygon layer: {}", zones_path.display());

    // Three zones inside the grid: two paddocks and a two-part reserve
    let zones = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"name": "north_paddock", "code": 101},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[142.2, -36.6], [142.8, -36.6], [142.8, -36.2], [142.2, -36.2], [142.2, -36.6]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"name": "south_paddock", "code": 102},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[143.0, -37.7], [143.6, -37.7], [143.6, -37.2], [143.0, -37.2], [143.0, -37.7]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"name": "creek_reserve", "code": 103},
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[142.3, -37.5], [142.6, -37.5], [142.6, -37.3], [142.3, -37.3], [142.3, -37.5]]],
          [[[143.4, -36.5], [143.7, -36.5], [143.7, -36.3], [143.4, -36.3], [143.4, -36.5]]]
        ]
      }
    }
  ]
}"#;
    std::fs::write(zones_path, zones)?;

    println!("✅ Successfully created sample data:");
    println!("   📏 Dimensions: time(24), y(20), x(20)");
    println!("   📈 Variables: time, y, x, ndvi (EPSG:4326)");
    println!("   🗺  Zones: north_paddock, south_paddock, creek_reserve");
    println!("\n🧪 Extract a zonal time series with:");
    println!("   cargo run -- -f sample_cube.nc --polygons zones.geojson --label name --stat mean --csv --plot");

    Ok(())
}
