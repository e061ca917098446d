//! Affine georeferencing transforms derived from coordinate arrays
//!
//! A raster's placement in the world is described by a six-element affine
//! transform in GDAL component order. This module derives that transform
//! from the X/Y coordinate vectors of a raster cube and provides the
//! pixel/world mappings the rasterizer needs.

use crate::errors::{Result, RuZonalError};

/// An affine transform in GDAL component order.
///
/// The components map pixel/line `(P, L)` raster space to world `(X, Y)`
/// space:
///
///   * `[0]`: x-coordinate of the upper-left corner of the upper-left pixel
///   * `[1]`: W-E pixel resolution (pixel width)
///   * `[2]`: row rotation (zero for north-up)
///   * `[3]`: y-coordinate of the upper-left corner of the upper-left pixel
///   * `[4]`: column rotation (zero for north-up)
///   * `[5]`: N-S pixel resolution (pixel height, negative for north-up)
///
/// so that `X = gt[0] + P*gt[1] + L*gt[2]` and `Y = gt[3] + P*gt[4] + L*gt[5]`.
pub type GeoTransform = [f64; 6];

/// Derives a [`GeoTransform`] from a raster's coordinate vectors.
///
/// `x` and `y` are the georeferencing coordinate arrays in X-then-Y order,
/// each at least two elements long; only the first two elements of each are
/// consulted. Returns exactly
///
/// ```text
/// [x[0], y[0] - y[1], rotation, y[0], rotation, x[0] - x[1]]
/// ```
///
/// For the usual north-up grid (ascending x, descending y, square pixels)
/// this places a positive pixel width in slot 1 and a negative pixel height
/// in slot 5. Coordinate ordering is not validated: axes running the other
/// way silently flip the derived resolution signs, which is the caller's
/// responsibility to avoid.
///
/// `rotation` is written into both rotation slots unchanged, which is only
/// meaningful for `rotation = 0.0`; nonzero values are passed through as-is.
pub fn transform_from_coords(x: &[f64], y: &[f64], rotation: f64) -> Result<GeoTransform> {
    if x.len() < 2 || y.len() < 2 {
        return Err(RuZonalError::CoordinateError(format!(
            "coordinate arrays need at least 2 elements to derive a resolution (got x: {}, y: {})",
            x.len(),
            y.len()
        )));
    }

    Ok([x[0], y[0] - y[1], rotation, y[0], rotation, x[0] - x[1]])
}

/// Pixel/world mapping operations on a [`GeoTransform`].
pub trait GeoTransformOps {
    /// Maps pixel/line coordinates to world coordinates.
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64);

    /// Constructs the inverse transform for world-to-pixel mapping.
    ///
    /// Fails when the transform is singular (zero determinant).
    fn invert(&self) -> Result<GeoTransform>;
}

impl GeoTransformOps for GeoTransform {
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64) {
        (
            self[0] + pixel * self[1] + line * self[2],
            self[3] + pixel * self[4] + line * self[5],
        )
    }

    fn invert(&self) -> Result<GeoTransform> {
        let [c, a, b, f, d, e] = *self;

        let det = a * e - b * d;
        if det.abs() < f64::EPSILON {
            return Err(RuZonalError::CoordinateError(
                "geo transform is not invertible".to_string(),
            ));
        }

        Ok([
            (b * f - c * e) / det,
            e / det,
            -b / det,
            (c * d - a * f) / det,
            -d / det,
            a / det,
        ])
    }
}

/// World coordinates of a pixel's center.
///
/// The pixel index addresses the cell `(row, col)` of a 2-D slice; the
/// returned point is half a pixel in from the cell's upper-left corner.
pub fn pixel_center(gt: &GeoTransform, row: usize, col: usize) -> (f64, f64) {
    gt.apply(col as f64 + 0.5, row as f64 + 0.5)
}
