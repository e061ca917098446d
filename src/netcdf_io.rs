//! NetCDF export of zonal-statistics tables
//!
//! Writes a result table to a fresh NetCDF file: one dimension for the
//! zones (named after the label attribute), one for time, a data variable
//! named after the statistic, and enough metadata to read the file back
//! without the inputs that produced it.

use std::{fs, path::Path};

use chrono::Utc;
use ndarray::Array1;

use crate::errors::Result;
use crate::table::StatTable;

/// Writes a table to `output_path`, replacing any existing file.
///
/// Layout of the produced file:
///
/// * dimension `<label_name>` of length `n_zones`, dimension `time` of
///   length `n_times`
/// * `f64` variable named after the statistic with dims
///   `(<label_name>, time)` and a NaN `_FillValue`
/// * `time` coordinate variable carrying the source cube's `units`
///   attribute when one was present
/// * zone labels stored as a global string-array attribute named after the
///   label attribute, in row order
pub fn write_table_to_netcdf(table: &StatTable, output_path: &Path) -> Result<()> {
    if output_path.exists() {
        fs::remove_file(output_path)?;
    }

    let mut file = netcdf::create(output_path)?;

    file.add_dimension(&table.label_name, table.n_zones())?;
    file.add_dimension("time", table.n_times())?;

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        if let Some(units) = &table.time_units {
            time_var.put_attribute("units", units.clone())?;
        }
        let time_array = Array1::from(table.time.clone());
        time_var.put(time_array.view(), ..)?;
    }

    {
        let dim_refs = [table.label_name.as_str(), "time"];
        let mut stat_var = file.add_variable::<f64>(table.statistic.name(), &dim_refs)?;
        stat_var.put_attribute("_FillValue", f64::NAN)?;
        stat_var.put_attribute(
            "long_name",
            format!("zonal {} per {}", table.statistic.name(), table.label_name),
        )?;
        stat_var.put(table.values.view(), ..)?;
    }

    file.add_attribute(&table.label_name, table.labels.clone())?;
    file.add_attribute(
        "history",
        format!("Created by RuZonal on {}", Utc::now().to_rfc3339()),
    )?;

    Ok(())
}
