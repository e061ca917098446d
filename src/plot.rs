//! PNG time-series plots, one per zone
//!
//! Each zone's series is rendered as a simple line chart: white canvas,
//! dashed grid, forest-green line, black frame. The zone label and
//! statistic name go into the filename, so no text is drawn on the canvas
//! and no font data is needed.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::errors::Result;
use crate::table::StatTable;

const WIDTH: u32 = 1500;
const HEIGHT: u32 = 500;
const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([200, 200, 200]);
const FRAME: Rgb<u8> = Rgb([0, 0, 0]);
// Forest green, #228b22
const SERIES: Rgb<u8> = Rgb([34, 139, 34]);

/// Renders one PNG per zone into `results_dir`.
///
/// Files are named `<label>_<statistic>.png` with the label sanitized for
/// use in a filename. Returns the written paths in zone order. Zones whose
/// series holds no finite value still produce a plot (empty axes), matching
/// what a user expects from batch output: one file per polygon, always.
pub fn write_series_plots(table: &StatTable, results_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(table.n_zones());

    for (i, label) in table.labels.iter().enumerate() {
        let series: Vec<f64> = table.values.row(i).to_vec();
        let canvas = render_series(&series);

        let filename = format!(
            "{}_{}.png",
            sanitize_label(label),
            table.statistic.name()
        );
        let path = results_dir.join(filename);
        canvas.save(&path)?;
        written.push(path);
    }

    Ok(written)
}

/// Draws a single series onto a fresh canvas.
fn render_series(series: &[f64]) -> RgbImage {
    let mut canvas: RgbImage = ImageBuffer::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    let left = MARGIN_LEFT as f32;
    let right = (WIDTH - MARGIN_RIGHT) as f32;
    let top = MARGIN_TOP as f32;
    let bottom = (HEIGHT - MARGIN_BOTTOM) as f32;

    draw_grid(&mut canvas, left, right, top, bottom);
    draw_frame(&mut canvas, left, right, top, bottom);

    let (min, max) = match finite_range(series) {
        Some(range) => range,
        None => return canvas,
    };
    // Flat series still need a nonzero span to land mid-plot
    let (min, max) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let x_of = |i: usize| -> f32 {
        if series.len() <= 1 {
            (left + right) / 2.0
        } else {
            left + (right - left) * i as f32 / (series.len() - 1) as f32
        }
    };
    let y_of = |v: f64| -> f32 { bottom - ((v - min) / (max - min)) as f32 * (bottom - top) };

    // NaN gaps break the line; isolated points get a small marker
    let mut previous: Option<(f32, f32)> = None;
    for (i, &value) in series.iter().enumerate() {
        if !value.is_finite() {
            previous = None;
            continue;
        }

        let point = (x_of(i), y_of(value));
        match previous {
            Some(prev) => draw_line_segment_mut(&mut canvas, prev, point, SERIES),
            None => {
                let neighbor_valid = i + 1 < series.len() && series[i + 1].is_finite();
                if !neighbor_valid {
                    draw_marker(&mut canvas, point);
                }
            }
        }
        previous = Some(point);
    }

    canvas
}

/// Dashed grid lines inside the plot rectangle.
fn draw_grid(canvas: &mut RgbImage, left: f32, right: f32, top: f32, bottom: f32) {
    const X_TICKS: u32 = 8;
    const Y_TICKS: u32 = 5;
    const DASH: f32 = 6.0;

    for tick in 1..X_TICKS {
        let x = left + (right - left) * tick as f32 / X_TICKS as f32;
        let mut y = top;
        while y < bottom {
            let end = (y + DASH).min(bottom);
            draw_line_segment_mut(canvas, (x, y), (x, end), GRID);
            y += DASH * 2.0;
        }
    }

    for tick in 1..Y_TICKS {
        let y = top + (bottom - top) * tick as f32 / Y_TICKS as f32;
        let mut x = left;
        while x < right {
            let end = (x + DASH).min(right);
            draw_line_segment_mut(canvas, (x, y), (end, y), GRID);
            x += DASH * 2.0;
        }
    }
}

/// Solid border around the plot rectangle.
fn draw_frame(canvas: &mut RgbImage, left: f32, right: f32, top: f32, bottom: f32) {
    draw_line_segment_mut(canvas, (left, top), (right, top), FRAME);
    draw_line_segment_mut(canvas, (right, top), (right, bottom), FRAME);
    draw_line_segment_mut(canvas, (right, bottom), (left, bottom), FRAME);
    draw_line_segment_mut(canvas, (left, bottom), (left, top), FRAME);
}

/// Small plus marker for points that have no neighbor to connect to.
fn draw_marker(canvas: &mut RgbImage, point: (f32, f32)) {
    let (x, y) = point;
    draw_line_segment_mut(canvas, (x - 3.0, y), (x + 3.0, y), SERIES);
    draw_line_segment_mut(canvas, (x, y - 3.0), (x, y + 3.0), SERIES);
}

/// Min and max of the finite values, or `None` when there are none.
fn finite_range(series: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in series {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// Makes a zone label safe to use as a filename component.
pub fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
