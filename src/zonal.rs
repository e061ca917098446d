//! Zonal statistic definitions and per-slice evaluation
//!
//! A zone is the set of raster cells whose centers fall inside a polygon.
//! Zones are rasterized once against the cube's geo transform and then
//! reduced to a single number per time slice with the chosen statistic.

use std::collections::HashMap;

use geo::{BoundingRect, Contains};
use geo_types::{MultiPolygon, Point};
use ndarray::ArrayView2;

use crate::errors::{Result, RuZonalError};
use crate::transform::{GeoTransform, GeoTransformOps};

/// Statistics that can be extracted per zone and time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonalStatistic {
    Count,
    Sum,
    Mean,
    Median,
    Min,
    Max,
    Std,
    Range,
    Majority,
    Minority,
    Unique,
}

impl ZonalStatistic {
    /// All supported statistics, in display order.
    pub const ALL: [ZonalStatistic; 11] = [
        ZonalStatistic::Count,
        ZonalStatistic::Sum,
        ZonalStatistic::Mean,
        ZonalStatistic::Median,
        ZonalStatistic::Min,
        ZonalStatistic::Max,
        ZonalStatistic::Std,
        ZonalStatistic::Range,
        ZonalStatistic::Majority,
        ZonalStatistic::Minority,
        ZonalStatistic::Unique,
    ];

    /// Parses a statistic name as used on the command line and in filenames.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "count" => Ok(ZonalStatistic::Count),
            "sum" => Ok(ZonalStatistic::Sum),
            "mean" => Ok(ZonalStatistic::Mean),
            "median" => Ok(ZonalStatistic::Median),
            "min" => Ok(ZonalStatistic::Min),
            "max" => Ok(ZonalStatistic::Max),
            "std" => Ok(ZonalStatistic::Std),
            "range" => Ok(ZonalStatistic::Range),
            "majority" => Ok(ZonalStatistic::Majority),
            "minority" => Ok(ZonalStatistic::Minority),
            "unique" => Ok(ZonalStatistic::Unique),
            other => Err(RuZonalError::StatisticsError(format!(
                "unknown statistic '{}' (expected one of: {})",
                other,
                ZonalStatistic::ALL
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// The statistic's canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ZonalStatistic::Count => "count",
            ZonalStatistic::Sum => "sum",
            ZonalStatistic::Mean => "mean",
            ZonalStatistic::Median => "median",
            ZonalStatistic::Min => "min",
            ZonalStatistic::Max => "max",
            ZonalStatistic::Std => "std",
            ZonalStatistic::Range => "range",
            ZonalStatistic::Majority => "majority",
            ZonalStatistic::Minority => "minority",
            ZonalStatistic::Unique => "unique",
        }
    }
}

impl std::fmt::Display for ZonalStatistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The raster cells belonging to one zone.
///
/// Cells are `(row, col)` indices into a 2-D slice. A mask is valid for
/// every time step of a cube because the grid geometry does not change
/// along the time axis.
#[derive(Debug, Clone)]
pub struct ZoneMask {
    pub cells: Vec<(usize, usize)>,
}

impl ZoneMask {
    /// Number of cells in the zone.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the zone covers no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rasterizes a polygon against a grid.
///
/// A cell belongs to the zone when its center lies strictly inside the
/// polygon. Only the cells under the polygon's bounding box are tested;
/// polygons entirely outside the grid produce an empty mask rather than an
/// error.
pub fn rasterize_zone(
    geometry: &MultiPolygon<f64>,
    gt: &GeoTransform,
    ny: usize,
    nx: usize,
) -> Result<ZoneMask> {
    let rect = match geometry.bounding_rect() {
        Some(rect) => rect,
        None => return Ok(ZoneMask { cells: Vec::new() }),
    };

    let inverse = gt.invert()?;

    // Map all four bounding-box corners to pixel space; with a negative
    // pixel height the line axis runs opposite to y, so min/max must be
    // taken after the mapping
    let corners = [
        inverse.apply(rect.min().x, rect.min().y),
        inverse.apply(rect.min().x, rect.max().y),
        inverse.apply(rect.max().x, rect.min().y),
        inverse.apply(rect.max().x, rect.max().y),
    ];
    let p_min = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let p_max = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
    let l_min = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let l_max = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

    // Widen by one cell so boundary-straddling centers are never skipped
    let col_start = (p_min.floor() - 1.0).max(0.0) as usize;
    let col_end = ((p_max.ceil() + 1.0).max(0.0) as usize).min(nx);
    let row_start = (l_min.floor() - 1.0).max(0.0) as usize;
    let row_end = ((l_max.ceil() + 1.0).max(0.0) as usize).min(ny);

    let mut cells = Vec::new();
    for row in row_start..row_end {
        for col in col_start..col_end {
            let (x, y) = crate::transform::pixel_center(gt, row, col);
            if geometry.contains(&Point::new(x, y)) {
                cells.push((row, col));
            }
        }
    }

    Ok(ZoneMask { cells })
}

/// Evaluates one statistic over a zone of a 2-D slice.
///
/// NaN cells are excluded. When no valid cells remain, `count` and
/// `unique` report `0.0` while every other statistic reports NaN.
pub fn slice_statistic(
    values: &ArrayView2<'_, f64>,
    mask: &ZoneMask,
    statistic: ZonalStatistic,
) -> f64 {
    let mut zone_values: Vec<f64> = Vec::with_capacity(mask.cells.len());
    for &(row, col) in &mask.cells {
        let value = values[[row, col]];
        if value.is_nan() {
            continue;
        }
        zone_values.push(value);
    }

    if zone_values.is_empty() {
        return match statistic {
            ZonalStatistic::Count | ZonalStatistic::Unique => 0.0,
            _ => f64::NAN,
        };
    }

    let count = zone_values.len();
    match statistic {
        ZonalStatistic::Count => count as f64,
        ZonalStatistic::Sum => zone_values.iter().sum(),
        ZonalStatistic::Mean => zone_values.iter().sum::<f64>() / count as f64,
        ZonalStatistic::Median => {
            zone_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            if count % 2 == 0 {
                (zone_values[count / 2 - 1] + zone_values[count / 2]) / 2.0
            } else {
                zone_values[count / 2]
            }
        }
        ZonalStatistic::Min => zone_values.iter().copied().fold(f64::INFINITY, f64::min),
        ZonalStatistic::Max => zone_values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max),
        ZonalStatistic::Std => {
            let mean = zone_values.iter().sum::<f64>() / count as f64;
            let variance = zone_values
                .iter()
                .map(|v| (v - mean) * (v - mean))
                .sum::<f64>()
                / count as f64;
            variance.sqrt()
        }
        ZonalStatistic::Range => {
            let min = zone_values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = zone_values
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            max - min
        }
        ZonalStatistic::Majority => pick_by_frequency(&zone_values, true),
        ZonalStatistic::Minority => pick_by_frequency(&zone_values, false),
        ZonalStatistic::Unique => {
            let mut counts: HashMap<u64, usize> = HashMap::new();
            for &v in &zone_values {
                *counts.entry(v.to_bits()).or_insert(0) += 1;
            }
            counts.len() as f64
        }
    }
}

/// Most (or least) frequent value in a zone.
///
/// Frequency ties resolve to the smallest value so results do not depend
/// on iteration order.
fn pick_by_frequency(zone_values: &[f64], most: bool) -> f64 {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for &v in zone_values {
        *counts.entry(v.to_bits()).or_insert(0) += 1;
    }

    let mut best_value = f64::NAN;
    let mut best_count: Option<usize> = None;
    for (&bits, &n) in &counts {
        let value = f64::from_bits(bits);
        let better = match best_count {
            None => true,
            Some(current) => {
                if most {
                    n > current || (n == current && value < best_value)
                } else {
                    n < current || (n == current && value < best_value)
                }
            }
        };
        if better {
            best_value = value;
            best_count = Some(n);
        }
    }

    best_value
}
