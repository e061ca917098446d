//! Zonal statistics result table and CSV export
//!
//! Extraction produces one value per zone and time step. The table stores
//! them zone-major (one row per polygon, one column per time step), which
//! is the layout the CSV export and the plots both read.

use std::path::Path;

use csv::Writer;
use ndarray::Array2;

use crate::errors::{Result, RuZonalError};
use crate::zonal::ZonalStatistic;

/// A complete zonal-statistics time series.
///
/// `values` has shape `(labels.len(), time.len())`; row order follows the
/// polygon layer, column order the cube's time axis.
#[derive(Debug, Clone)]
pub struct StatTable {
    /// Statistic the values were extracted with.
    pub statistic: ZonalStatistic,
    /// Name of the label attribute the rows are keyed by.
    pub label_name: String,
    /// Zone labels, in layer order.
    pub labels: Vec<String>,
    /// Raw time coordinate values.
    pub time: Vec<f64>,
    /// The source cube's time `units` attribute, for CF-faithful export.
    pub time_units: Option<String>,
    /// Display labels for the time axis (decoded dates where possible).
    pub time_labels: Vec<String>,
    /// Statistic values, `(zone, time)`.
    pub values: Array2<f64>,
}

impl StatTable {
    /// Assembles a table, validating that all parts agree in shape.
    pub fn new(
        statistic: ZonalStatistic,
        label_name: &str,
        labels: Vec<String>,
        time: Vec<f64>,
        time_units: Option<String>,
        time_labels: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self> {
        let (rows, cols) = values.dim();
        if labels.len() != rows || time.len() != cols || time_labels.len() != cols {
            return Err(RuZonalError::StatisticsError(format!(
                "table shape mismatch: {} labels, {} times, values {:?}",
                labels.len(),
                time.len(),
                (rows, cols)
            )));
        }

        Ok(StatTable {
            statistic,
            label_name: label_name.to_string(),
            labels,
            time,
            time_units,
            time_labels,
            values,
        })
    }

    /// Number of zones (rows).
    pub fn n_zones(&self) -> usize {
        self.labels.len()
    }

    /// Number of time steps (columns).
    pub fn n_times(&self) -> usize {
        self.time.len()
    }

    /// Writes the table as CSV.
    ///
    /// The header row holds the label attribute's name followed by the time
    /// labels; each data row holds a zone label and its series. NaN cells
    /// are written empty.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Writer::from_path(path.as_ref())?;

        let mut header = Vec::with_capacity(self.n_times() + 1);
        header.push(self.label_name.clone());
        header.extend(self.time_labels.iter().cloned());
        writer.write_record(&header)?;

        for (i, label) in self.labels.iter().enumerate() {
            let mut record = Vec::with_capacity(self.n_times() + 1);
            record.push(label.clone());
            for &value in self.values.row(i) {
                record.push(format_cell(value));
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Formats one table cell for CSV.
///
/// NaN becomes an empty field; whole numbers keep a trailing `.0` so the
/// column stays recognizably floating point.
fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
