//! Coordinate reference system handling
//!
//! Rasters carry their CRS as an attribute string such as `"EPSG:3577"`;
//! polygon layers declare theirs in GeoJSON. Before any pixels are matched
//! against polygons the two must agree, so this module parses EPSG
//! identifiers and reprojects polygon coordinates with `proj4rs` (pure
//! Rust, no PROJ system dependency).

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::errors::{Result, RuZonalError};

/// Extracts a numeric EPSG code from a CRS identifier string.
///
/// Accepts the forms commonly found in NetCDF attributes and GeoJSON:
/// `"EPSG:4326"`, `"epsg:4326"`, the URN form
/// `"urn:ogc:def:crs:EPSG::4326"`, and a bare `"4326"`.
pub fn parse_epsg(crs: &str) -> Result<u32> {
    let trimmed = crs.trim();

    // Bare numeric code
    if let Ok(code) = trimmed.parse::<u32>() {
        return Ok(code);
    }

    // "EPSG:xxxx" or "urn:ogc:def:crs:EPSG::xxxx" - the code is whatever
    // follows the last ':'
    if let Some(tail) = trimmed.rsplit(':').next() {
        let lower = trimmed.to_lowercase();
        if lower.starts_with("epsg:") || lower.starts_with("urn:ogc:def:crs:epsg:") {
            return tail.parse::<u32>().map_err(|_| {
                RuZonalError::CrsError(format!("could not parse EPSG code from '{}'", crs))
            });
        }
    }

    Err(RuZonalError::CrsError(format!(
        "unrecognized CRS identifier '{}' (expected EPSG:<code>, urn:ogc:def:crs:EPSG::<code>, or a bare code)",
        crs
    )))
}

/// Returns the proj4 definition string for a supported EPSG code.
///
/// Covers the geographic and projected systems this tool encounters in
/// practice: WGS84 and GDA94 geographic, Web Mercator, Australian Albers,
/// and the WGS84 UTM / MGA94 zone families. Returns `None` for anything
/// else.
pub fn proj_string_for_epsg(epsg: u32) -> Option<String> {
    match epsg {
        // WGS84 geographic
        4326 => Some("+proj=longlat +datum=WGS84 +no_defs".to_string()),
        // GDA94 geographic
        4283 => Some(
            "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs".to_string(),
        ),
        // Web Mercator
        3857 => Some(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 \
             +units=m +no_defs"
                .to_string(),
        ),
        // GDA94 / Australian Albers
        3577 => Some(
            "+proj=aea +lat_1=-18 +lat_2=-36 +lat_0=0 +lon_0=132 +x_0=0 +y_0=0 \
             +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"
                .to_string(),
        ),
        // WGS84 UTM, northern hemisphere
        32601..=32660 => Some(format!(
            "+proj=utm +zone={} +datum=WGS84 +units=m +no_defs",
            epsg - 32600
        )),
        // WGS84 UTM, southern hemisphere
        32701..=32760 => Some(format!(
            "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
            epsg - 32700
        )),
        // GDA94 / MGA zones
        28348..=28358 => Some(format!(
            "+proj=utm +zone={} +south +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
            epsg - 28300
        )),
        _ => None,
    }
}

/// Whether an EPSG code names a geographic (degree-based) CRS.
///
/// `proj4rs` works in radians for geographic systems, so callers need this
/// to decide when to convert.
pub fn is_geographic(epsg: u32) -> bool {
    matches!(epsg, 4326 | 4283)
}

/// Transforms coordinates between two EPSG-identified systems.
///
/// Wraps a pair of `proj4rs` projections and handles the degree/radian
/// conversion that geographic systems require. When source and target are
/// the same code the transform is the identity and `proj4rs` is never
/// consulted.
pub struct CoordTransformer {
    source_proj: Option<Proj>,
    target_proj: Option<Proj>,
    source_is_geographic: bool,
    target_is_geographic: bool,
}

impl CoordTransformer {
    /// Builds a transformer from `source_epsg` to `target_epsg`.
    ///
    /// Fails with `CrsError` when either code is outside the supported
    /// table, or `ProjectionError` when `proj4rs` rejects a definition.
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        if source_epsg == target_epsg {
            return Ok(CoordTransformer {
                source_proj: None,
                target_proj: None,
                source_is_geographic: is_geographic(source_epsg),
                target_is_geographic: is_geographic(target_epsg),
            });
        }

        let source_str = proj_string_for_epsg(source_epsg).ok_or_else(|| {
            RuZonalError::CrsError(format!("unsupported source CRS EPSG:{}", source_epsg))
        })?;
        let target_str = proj_string_for_epsg(target_epsg).ok_or_else(|| {
            RuZonalError::CrsError(format!("unsupported target CRS EPSG:{}", target_epsg))
        })?;

        let source_proj = Proj::from_proj_string(&source_str).map_err(|e| {
            RuZonalError::ProjectionError(format!(
                "invalid projection for EPSG:{}: {:?}",
                source_epsg, e
            ))
        })?;
        let target_proj = Proj::from_proj_string(&target_str).map_err(|e| {
            RuZonalError::ProjectionError(format!(
                "invalid projection for EPSG:{}: {:?}",
                target_epsg, e
            ))
        })?;

        Ok(CoordTransformer {
            source_proj: Some(source_proj),
            target_proj: Some(target_proj),
            source_is_geographic: is_geographic(source_epsg),
            target_is_geographic: is_geographic(target_epsg),
        })
    }

    /// Whether this transformer passes coordinates through unchanged.
    pub fn is_identity(&self) -> bool {
        self.source_proj.is_none()
    }

    /// Transforms a single `(x, y)` point from the source to the target CRS.
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (source_proj, target_proj) = match (&self.source_proj, &self.target_proj) {
            (Some(s), Some(t)) => (s, t),
            _ => return Ok((x, y)),
        };

        // proj4rs expects geographic coordinates in radians
        let (in_x, in_y) = if self.source_is_geographic {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        let mut point = (in_x, in_y, 0.0);
        transform(source_proj, target_proj, &mut point).map_err(|e| {
            RuZonalError::ProjectionError(format!(
                "coordinate transform failed for ({}, {}): {:?}",
                x, y, e
            ))
        })?;

        let (out_x, out_y) = if self.target_is_geographic {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        Ok((out_x, out_y))
    }
}
