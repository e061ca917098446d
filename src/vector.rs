//! Polygon layer loading and reprojection
//!
//! Zones are supplied as a GeoJSON FeatureCollection of Polygon or
//! MultiPolygon features. The collection is parsed with `serde_json` into
//! `geo` geometry types, each feature labelled by a caller-chosen property,
//! and the whole layer reprojected to the raster's CRS before any pixels
//! are matched.

use std::fs;
use std::path::Path;

use geo::MapCoordsInPlace;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::crs::{parse_epsg, CoordTransformer};
use crate::errors::{Result, RuZonalError};

/// One labelled zone from the input layer.
#[derive(Debug, Clone)]
pub struct PolygonFeature {
    /// Value of the label attribute, rendered as a string.
    pub label: String,
    /// Feature geometry; plain polygons are stored as single-part multis.
    pub geometry: MultiPolygon<f64>,
}

/// An ordered collection of labelled polygons in a single CRS.
///
/// Feature order follows the source file and is preserved through
/// reprojection and statistics extraction, so output rows line up with the
/// input layer.
#[derive(Debug, Clone)]
pub struct PolygonLayer {
    pub features: Vec<PolygonFeature>,
    /// Name of the property the labels were read from.
    pub label_name: String,
    /// EPSG code the coordinates are currently expressed in.
    pub epsg: u32,
}

impl PolygonLayer {
    /// Reads a GeoJSON FeatureCollection from `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the GeoJSON file
    /// * `label_attribute` - Feature property used to label each polygon;
    ///   every feature must carry it
    ///
    /// The collection's legacy `crs` member is honoured when present;
    /// otherwise coordinates are taken to be EPSG:4326 as the GeoJSON
    /// specification prescribes.
    pub fn from_geojson_file<P: AsRef<Path>>(path: P, label_attribute: &str) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_geojson_str(&text, label_attribute)
    }

    /// Parses a GeoJSON FeatureCollection from a string.
    pub fn from_geojson_str(text: &str, label_attribute: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;

        match root.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {}
            other => {
                return Err(RuZonalError::GeoJsonError(format!(
                    "expected a FeatureCollection, found type {:?}",
                    other
                )))
            }
        }

        let epsg = match root.get("crs") {
            Some(crs) => parse_crs_member(crs)?,
            None => 4326,
        };

        let raw_features = root
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RuZonalError::GeoJsonError("FeatureCollection has no 'features' array".to_string())
            })?;

        let mut features = Vec::with_capacity(raw_features.len());
        for (index, feature) in raw_features.iter().enumerate() {
            let label = feature
                .get("properties")
                .and_then(|props| props.get(label_attribute))
                .map(label_to_string)
                .transpose()?
                .ok_or_else(|| RuZonalError::AttributeNotFound {
                    attribute: format!("{} (feature {})", label_attribute, index),
                })?;

            let geometry_value = feature.get("geometry").ok_or_else(|| {
                RuZonalError::GeoJsonError(format!("feature {} has no geometry", index))
            })?;
            let geometry = parse_geometry(geometry_value, index)?;

            features.push(PolygonFeature { label, geometry });
        }

        Ok(PolygonLayer {
            features,
            label_name: label_attribute.to_string(),
            epsg,
        })
    }

    /// Reprojects all features to `target_epsg` in place.
    ///
    /// A no-op when the layer already uses the target system.
    pub fn reproject(&mut self, target_epsg: u32) -> Result<()> {
        if self.epsg == target_epsg {
            return Ok(());
        }

        let transformer = CoordTransformer::new(self.epsg, target_epsg)?;
        for feature in &mut self.features {
            feature
                .geometry
                .try_map_coords_in_place(|coord: Coord<f64>| {
                    let (x, y) = transformer.transform(coord.x, coord.y)?;
                    Ok::<Coord<f64>, RuZonalError>(Coord { x, y })
                })?;
        }

        self.epsg = target_epsg;
        Ok(())
    }

    /// Labels of all features, in layer order.
    pub fn labels(&self) -> Vec<String> {
        self.features.iter().map(|f| f.label.clone()).collect()
    }

    /// Number of features in the layer.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the layer holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Renders a label property value as a string.
///
/// Strings pass through, numbers and booleans use their JSON rendering;
/// anything else (null, arrays, objects) is rejected.
fn label_to_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(RuZonalError::GeoJsonError(format!(
            "label attribute has unusable value {}",
            other
        ))),
    }
}

/// Parses the legacy `crs` member of a FeatureCollection.
fn parse_crs_member(crs: &Value) -> Result<u32> {
    let name = crs
        .get("properties")
        .and_then(|props| props.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            RuZonalError::GeoJsonError("'crs' member has no properties.name".to_string())
        })?;
    parse_epsg(name)
}

/// Converts a GeoJSON geometry object into a `MultiPolygon`.
fn parse_geometry(geometry: &Value, index: usize) -> Result<MultiPolygon<f64>> {
    let kind = geometry.get("type").and_then(Value::as_str).ok_or_else(|| {
        RuZonalError::GeoJsonError(format!("feature {} geometry has no type", index))
    })?;
    let coordinates = geometry.get("coordinates").ok_or_else(|| {
        RuZonalError::GeoJsonError(format!("feature {} geometry has no coordinates", index))
    })?;

    match kind {
        "Polygon" => Ok(MultiPolygon(vec![parse_polygon(coordinates, index)?])),
        "MultiPolygon" => {
            let parts = coordinates.as_array().ok_or_else(|| {
                RuZonalError::GeoJsonError(format!(
                    "feature {}: MultiPolygon coordinates are not an array",
                    index
                ))
            })?;
            let polygons = parts
                .iter()
                .map(|part| parse_polygon(part, index))
                .collect::<Result<Vec<_>>>()?;
            Ok(MultiPolygon(polygons))
        }
        other => Err(RuZonalError::GeoJsonError(format!(
            "feature {}: unsupported geometry type '{}' (only Polygon and MultiPolygon are accepted)",
            index, other
        ))),
    }
}

/// Parses one polygon's ring array (exterior first, then any holes).
fn parse_polygon(coordinates: &Value, index: usize) -> Result<Polygon<f64>> {
    let rings = coordinates.as_array().ok_or_else(|| {
        RuZonalError::GeoJsonError(format!(
            "feature {}: Polygon coordinates are not an array of rings",
            index
        ))
    })?;

    if rings.is_empty() {
        return Err(RuZonalError::GeoJsonError(format!(
            "feature {}: polygon has no rings",
            index
        )));
    }

    let exterior = parse_ring(&rings[0], index)?;
    let interiors = rings[1..]
        .iter()
        .map(|ring| parse_ring(ring, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parses a single linear ring into a `LineString`.
///
/// Extra vertex ordinates beyond x/y (altitude) are ignored.
fn parse_ring(ring: &Value, index: usize) -> Result<LineString<f64>> {
    let positions = ring.as_array().ok_or_else(|| {
        RuZonalError::GeoJsonError(format!("feature {}: ring is not an array", index))
    })?;

    let mut coords = Vec::with_capacity(positions.len());
    for position in positions {
        let pair = position.as_array().ok_or_else(|| {
            RuZonalError::GeoJsonError(format!(
                "feature {}: ring position is not an array",
                index
            ))
        })?;
        if pair.len() < 2 {
            return Err(RuZonalError::GeoJsonError(format!(
                "feature {}: ring position has fewer than 2 ordinates",
                index
            )));
        }
        let x = pair[0].as_f64().ok_or_else(|| {
            RuZonalError::GeoJsonError(format!("feature {}: non-numeric x ordinate", index))
        })?;
        let y = pair[1].as_f64().ok_or_else(|| {
            RuZonalError::GeoJsonError(format!("feature {}: non-numeric y ordinate", index))
        })?;
        coords.push(Coord { x, y });
    }

    Ok(LineString::from(coords))
}
