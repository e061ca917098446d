//! Raster cube loading from NetCDF files
//!
//! The statistics pipeline operates on a 3-D cube of values ordered
//! `(time, y, x)` together with its coordinate vectors and CRS. This module
//! reads such a cube from a NetCDF file, resolving dimension-name aliases
//! (`lat`/`latitude`, `lon`/`longitude`) and auto-detecting the data
//! variable when the caller does not name one.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use ndarray::{Array3, ArrayView2, Axis};
use netcdf::AttributeValue;

use crate::errors::{Result, RuZonalError};
use crate::transform::{transform_from_coords, GeoTransform};

/// Dimension-name aliases accepted for each axis of the cube.
const TIME_NAMES: &[&str] = &["time"];
const Y_NAMES: &[&str] = &["y", "lat", "latitude"];
const X_NAMES: &[&str] = &["x", "lon", "longitude"];

/// A single-variable raster time series in memory.
///
/// Data is stored `(time, y, x)`; the coordinate vectors give the world
/// position of each axis and must each hold at least two elements so a
/// resolution can be derived.
#[derive(Debug, Clone)]
pub struct RasterCube {
    /// Name of the source variable.
    pub name: String,
    /// Values ordered `(time, y, x)`.
    pub data: Array3<f64>,
    /// Time coordinate values, raw (possibly CF-encoded offsets).
    pub time: Vec<f64>,
    /// The time coordinate's `units` attribute, e.g. `"days since 2000-01-01"`.
    pub time_units: Option<String>,
    /// X (easting / longitude) coordinate values.
    pub x: Vec<f64>,
    /// Y (northing / latitude) coordinate values.
    pub y: Vec<f64>,
    /// CRS identifier attribute, e.g. `"EPSG:3577"`.
    pub crs: Option<String>,
}

impl RasterCube {
    /// Builds a cube from in-memory parts, validating shape consistency.
    pub fn new(
        name: &str,
        data: Array3<f64>,
        time: Vec<f64>,
        time_units: Option<String>,
        x: Vec<f64>,
        y: Vec<f64>,
        crs: Option<String>,
    ) -> Result<Self> {
        let (nt, ny, nx) = data.dim();
        if time.len() != nt || y.len() != ny || x.len() != nx {
            return Err(RuZonalError::CoordinateError(format!(
                "coordinate lengths (time: {}, y: {}, x: {}) do not match data shape {:?}",
                time.len(),
                y.len(),
                x.len(),
                (nt, ny, nx)
            )));
        }
        if x.len() < 2 || y.len() < 2 {
            return Err(RuZonalError::CoordinateError(
                "x and y coordinates need at least 2 elements each".to_string(),
            ));
        }

        Ok(RasterCube {
            name: name.to_string(),
            data,
            time,
            time_units,
            x,
            y,
            crs,
        })
    }

    /// Loads a raster cube from a NetCDF file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the NetCDF file
    /// * `variable` - Name of the data variable; when `None`, the file must
    ///   contain exactly one 3-dimensional variable, which is used
    ///
    /// The variable's dimensions must be ordered `(time, y, x)`, with the
    /// spatial axes accepted under their common aliases. Coordinate
    /// variables of the same names supply the axis values; a missing time
    /// coordinate falls back to plain indices.
    pub fn from_netcdf<P: AsRef<std::path::Path>>(path: P, variable: Option<&str>) -> Result<Self> {
        let file = netcdf::open(path.as_ref())?;

        let var_name = match variable {
            Some(name) => {
                if file.variable(name).is_none() {
                    return Err(RuZonalError::VariableNotFound {
                        var: name.to_string(),
                    });
                }
                name.to_string()
            }
            None => detect_cube_variable(&file)?,
        };

        let var = file
            .variable(&var_name)
            .ok_or_else(|| RuZonalError::VariableNotFound {
                var: var_name.clone(),
            })?;

        let dim_names: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| d.name().to_string())
            .collect();

        if dim_names.len() != 3 {
            return Err(RuZonalError::CoordinateError(format!(
                "variable '{}' has {} dimensions, expected 3 (time, y, x)",
                var_name,
                dim_names.len()
            )));
        }

        // The cube layout is positional, so aliases must match in order
        require_axis(&var_name, &dim_names[0], TIME_NAMES, "time")?;
        require_axis(&var_name, &dim_names[1], Y_NAMES, "y")?;
        require_axis(&var_name, &dim_names[2], X_NAMES, "x")?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let (nt, ny, nx) = (shape[0], shape[1], shape[2]);

        println!("🚀 Loading '{}' with shape {:?}", var_name, (nt, ny, nx));
        let data_vec = var.get_values::<f64, _>(..)?;
        let data = Array3::from_shape_vec((nt, ny, nx), data_vec)?;

        let x = read_coordinate(&file, &dim_names[2])?.ok_or_else(|| {
            RuZonalError::CoordinateError(format!(
                "no coordinate variable for x dimension '{}'",
                dim_names[2]
            ))
        })?;
        let y = read_coordinate(&file, &dim_names[1])?.ok_or_else(|| {
            RuZonalError::CoordinateError(format!(
                "no coordinate variable for y dimension '{}'",
                dim_names[1]
            ))
        })?;
        let time = match read_coordinate(&file, &dim_names[0])? {
            Some(values) => values,
            None => {
                println!(
                    "⚠ No coordinate variable for '{}', using plain indices",
                    dim_names[0]
                );
                (0..nt).map(|i| i as f64).collect()
            }
        };

        let time_units = file
            .variable(&dim_names[0])
            .and_then(|t| string_attribute_of(&t, "units"));

        // The CRS may be stamped on the variable or on the file itself
        let crs = string_attribute_of(&var, "crs").or_else(|| {
            file.attribute("crs")
                .and_then(|a| a.value().ok())
                .and_then(|v| match v {
                    AttributeValue::Str(s) => Some(s),
                    _ => None,
                })
        });

        Self::new(&var_name, data, time, time_units, x, y, crs)
    }

    /// `(time, y, x)` extent of the cube.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// The 2-D slice at time step `t`.
    pub fn slice(&self, t: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(0), t)
    }

    /// Affine transform placing this cube's pixels in its CRS.
    pub fn geo_transform(&self) -> Result<GeoTransform> {
        transform_from_coords(&self.x, &self.y, 0.0)
    }

    /// Numeric EPSG code parsed from the cube's CRS attribute.
    pub fn epsg(&self) -> Result<u32> {
        let crs = self.crs.as_deref().ok_or_else(|| {
            RuZonalError::CrsError(format!(
                "variable '{}' carries no 'crs' attribute",
                self.name
            ))
        })?;
        crate::crs::parse_epsg(crs)
    }

    /// Human-readable labels for each time step.
    ///
    /// CF-encoded time axes (`"<unit> since <epoch>"` with day, hour,
    /// minute or second units) decode to calendar dates; anything else
    /// falls back to the numeric coordinate values.
    pub fn time_labels(&self) -> Vec<String> {
        self.time
            .iter()
            .map(|&value| {
                self.time_units
                    .as_deref()
                    .and_then(|units| decode_cf_time(value, units))
                    .unwrap_or_else(|| format_time_value(value))
            })
            .collect()
    }
}

/// Finds the single 3-dimensional variable of a file.
fn detect_cube_variable(file: &netcdf::File) -> Result<String> {
    let candidates: Vec<String> = file
        .variables()
        .filter(|v| v.dimensions().len() == 3)
        .map(|v| v.name().to_string())
        .collect();

    match candidates.len() {
        1 => Ok(candidates.into_iter().next().unwrap()),
        0 => Err(RuZonalError::Generic(
            "no 3-dimensional variable found; name one explicitly".to_string(),
        )),
        _ => Err(RuZonalError::Generic(format!(
            "multiple 3-dimensional variables found ({}); name one explicitly",
            candidates.join(", ")
        ))),
    }
}

/// Checks a dimension name against the aliases accepted for an axis.
fn require_axis(var: &str, dim: &str, aliases: &[&str], axis: &str) -> Result<()> {
    if aliases.iter().any(|a| a.eq_ignore_ascii_case(dim)) {
        Ok(())
    } else {
        Err(RuZonalError::DimensionNotFound {
            var: var.to_string(),
            dim: format!("{} (expected a {} axis: one of {:?})", dim, axis, aliases),
        })
    }
}

/// Reads a 1-D coordinate variable by name, if the file has one.
fn read_coordinate(file: &netcdf::File, name: &str) -> Result<Option<Vec<f64>>> {
    match file.variable(name) {
        Some(var) => Ok(Some(var.get_values::<f64, _>(..)?)),
        None => Ok(None),
    }
}

/// Reads a string attribute from a variable.
fn string_attribute_of(var: &netcdf::Variable, name: &str) -> Option<String> {
    var.attribute(name)
        .and_then(|attr| attr.value().ok())
        .and_then(|value| match value {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        })
}

/// Decodes one CF-style time value against a units string.
///
/// Returns `None` when the units string is not of the recognized
/// `"<unit> since <epoch>"` form.
pub fn decode_cf_time(value: f64, units: &str) -> Option<String> {
    let mut parts = units.splitn(2, " since ");
    let unit = parts.next()?.trim().to_lowercase();
    let epoch_text = parts.next()?.trim();

    let seconds_per_unit: f64 = match unit.as_str() {
        "days" | "day" => 86_400.0,
        "hours" | "hour" => 3_600.0,
        "minutes" | "minute" => 60.0,
        "seconds" | "second" => 1.0,
        _ => return None,
    };

    let epoch = parse_epoch(epoch_text)?;
    let stamp = epoch + Duration::seconds((value * seconds_per_unit).round() as i64);

    if stamp.time() == NaiveTime::from_hms_opt(0, 0, 0)? {
        Some(stamp.format("%Y-%m-%d").to_string())
    } else if stamp.time().second() == 0 {
        Some(stamp.format("%Y-%m-%d %H:%M").to_string())
    } else {
        Some(stamp.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

/// Parses the epoch part of a CF units string.
fn parse_epoch(text: &str) -> Option<NaiveDateTime> {
    let cleaned = text.trim_end_matches('Z').trim_end_matches(" UTC").trim();

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats a raw time coordinate for use as a column label.
fn format_time_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
