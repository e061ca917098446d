//! Comprehensive unit tests for RuZonal modules
//!
//! These tests provide extensive coverage of the core functionality
//! to ensure reliability and prevent regressions.

use geo::{LineString, MultiPolygon, Polygon};
use ndarray::arr2;
use ru_zonal::{
    crs::{is_geographic, parse_epsg, proj_string_for_epsg, CoordTransformer},
    errors::RuZonalError,
    parallel::{get_parallel_info, ParallelConfig},
    plot::sanitize_label,
    raster::decode_cf_time,
    timeseries::chunk_ranges,
    transform::{pixel_center, transform_from_coords, GeoTransformOps},
    vector::PolygonLayer,
    zonal::{rasterize_zone, slice_statistic, ZonalStatistic, ZoneMask},
};

/// A 6x6 north-up grid: x centers 0.5..5.5, y centers 5.5..0.5.
fn sample_transform() -> [f64; 6] {
    let x: Vec<f64> = (0..6).map(|i| 0.5 + i as f64).collect();
    let y: Vec<f64> = (0..6).map(|i| 5.5 - i as f64).collect();
    transform_from_coords(&x, &y, 0.0).expect("transform should derive")
}

fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![Polygon::new(
        LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
        vec![],
    )])
}

#[test]
fn test_error_types() {
    let var_err = RuZonalError::VariableNotFound {
        var: "ndvi".to_string(),
    };
    assert!(format!("{}", var_err).contains("Variable 'ndvi' not found"));

    let dim_err = RuZonalError::DimensionNotFound {
        var: "ndvi".to_string(),
        dim: "time".to_string(),
    };
    assert!(format!("{}", dim_err).contains("Dimension 'time' not found in variable 'ndvi'"));

    let attr_err = RuZonalError::AttributeNotFound {
        attribute: "name".to_string(),
    };
    assert!(format!("{}", attr_err).contains("Attribute 'name' not found"));

    let generic_err = RuZonalError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");

    let crs_err = RuZonalError::CrsError("bad code".to_string());
    assert!(format!("{}", crs_err).contains("CRS error: bad code"));
}

#[test]
fn test_parallel_config() {
    let default_config = ParallelConfig::new(None);
    assert!(default_config.num_threads.is_none());

    let config_4 = ParallelConfig::with_threads(4);
    assert_eq!(config_4.num_threads, Some(4));

    let all_cores_config = ParallelConfig::all_cores();
    assert!(all_cores_config.num_threads.is_some());
    assert!(all_cores_config.num_threads.unwrap() > 0);

    let current = default_config.current_threads();
    assert!(current > 0);
}

#[test]
fn test_parallel_info() {
    let info = get_parallel_info();
    assert!(info.current_threads > 0);
    assert!(info.available_cores > 0);
    assert!(info.available_parallelism > 0);

    // Printing must not panic
    info.print_info();
}

#[test]
fn test_transform_from_coords() {
    // Ascending x, descending y: positive pixel width, negative height
    let gt = sample_transform();
    assert_eq!(gt, [0.5, 1.0, 0.0, 5.5, 0.0, -1.0]);

    // The derivation reads slot 1 from y and slot 5 from x
    let x = vec![10.0, 12.0, 14.0];
    let y = vec![100.0, 97.0, 94.0];
    let gt = transform_from_coords(&x, &y, 0.0).unwrap();
    assert_eq!(gt, [10.0, 3.0, 0.0, 100.0, 0.0, -2.0]);
}

#[test]
fn test_transform_from_coords_too_short() {
    let err = transform_from_coords(&[1.0], &[5.0, 4.0], 0.0).unwrap_err();
    assert!(matches!(err, RuZonalError::CoordinateError(_)));

    let err = transform_from_coords(&[1.0, 2.0], &[], 0.0).unwrap_err();
    assert!(format!("{}", err).contains("at least 2 elements"));
}

#[test]
fn test_transform_apply_and_invert() {
    let gt = sample_transform();

    // Upper-left corner and one interior point
    assert_eq!(gt.apply(0.0, 0.0), (0.5, 5.5));
    assert_eq!(gt.apply(2.5, 1.5), (3.0, 4.0));

    // Inverse maps world coordinates back to pixel/line
    let inv = gt.invert().expect("north-up transform is invertible");
    let (p, l) = inv.apply(3.0, 4.0);
    assert!((p - 2.5).abs() < 1e-12);
    assert!((l - 1.5).abs() < 1e-12);

    // A transform with zero resolution is singular
    let singular = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    assert!(singular.invert().is_err());
}

#[test]
fn test_pixel_center() {
    let gt = sample_transform();
    // Row 0, col 0 sits half a pixel in from the origin
    assert_eq!(pixel_center(&gt, 0, 0), (1.0, 5.0));
    assert_eq!(pixel_center(&gt, 5, 5), (6.0, 0.0));
    assert_eq!(pixel_center(&gt, 3, 1), (2.0, 2.0));
}

#[test]
fn test_chunk_ranges() {
    let ranges = chunk_ranges(100, 20);
    assert_eq!(ranges.len(), 5);
    assert_eq!(ranges[0], 0..20);
    assert_eq!(ranges[4], 80..100);

    // Last chunk may be short
    let ranges = chunk_ranges(7, 3);
    assert_eq!(ranges, vec![0..3, 3..6, 6..7]);

    // Degenerate cases
    assert!(chunk_ranges(0, 20).is_empty());
    assert_eq!(chunk_ranges(5, 0), vec![0..5]);
    assert_eq!(chunk_ranges(5, 100), vec![0..5]);
}

#[test]
fn test_statistic_names() {
    for stat in ZonalStatistic::ALL {
        let parsed = ZonalStatistic::from_name(stat.name()).unwrap();
        assert_eq!(parsed, stat);
    }

    // Case-insensitive
    assert_eq!(
        ZonalStatistic::from_name("MEAN").unwrap(),
        ZonalStatistic::Mean
    );

    let err = ZonalStatistic::from_name("variance").unwrap_err();
    assert!(format!("{}", err).contains("unknown statistic 'variance'"));
}

#[test]
fn test_slice_statistic_basic() {
    let values = arr2(&[[1.0, 2.0], [3.0, f64::NAN]]);
    let view = values.view();
    let mask = ZoneMask {
        cells: vec![(0, 0), (0, 1), (1, 0), (1, 1)],
    };

    // The NaN cell is excluded from every statistic
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Count), 3.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Sum), 6.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Mean), 2.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Median), 2.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Min), 1.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Max), 3.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Range), 2.0);

    // Population standard deviation of [1, 2, 3]
    let std = slice_statistic(&view, &mask, ZonalStatistic::Std);
    assert!((std - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
}

#[test]
fn test_slice_statistic_median_even() {
    let values = arr2(&[[1.0, 2.0, 4.0, 10.0]]);
    let view = values.view();
    let mask = ZoneMask {
        cells: vec![(0, 0), (0, 1), (0, 2), (0, 3)],
    };

    // Even count: average of the two middle values
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Median), 3.0);
}

#[test]
fn test_slice_statistic_categorical() {
    let values = arr2(&[[1.0, 1.0, 2.0], [5.0, 5.0, 5.0]]);
    let view = values.view();
    let mask = ZoneMask {
        cells: vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)],
    };

    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Majority), 5.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Minority), 2.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Unique), 3.0);
}

#[test]
fn test_slice_statistic_frequency_ties() {
    let values = arr2(&[[2.0, 2.0, 1.0, 1.0]]);
    let view = values.view();
    let mask = ZoneMask {
        cells: vec![(0, 0), (0, 1), (0, 2), (0, 3)],
    };

    // Ties resolve to the smallest value
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Majority), 1.0);
    assert_eq!(slice_statistic(&view, &mask, ZonalStatistic::Minority), 1.0);
}

#[test]
fn test_slice_statistic_empty_zone() {
    let values = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
    let view = values.view();
    let empty = ZoneMask { cells: vec![] };

    assert_eq!(slice_statistic(&view, &empty, ZonalStatistic::Count), 0.0);
    assert_eq!(slice_statistic(&view, &empty, ZonalStatistic::Unique), 0.0);
    assert!(slice_statistic(&view, &empty, ZonalStatistic::Mean).is_nan());
    assert!(slice_statistic(&view, &empty, ZonalStatistic::Max).is_nan());

    // All-NaN zones behave like empty ones
    let nan_values = arr2(&[[f64::NAN, f64::NAN]]);
    let nan_view = nan_values.view();
    let mask = ZoneMask {
        cells: vec![(0, 0), (0, 1)],
    };
    assert_eq!(slice_statistic(&nan_view, &mask, ZonalStatistic::Count), 0.0);
    assert!(slice_statistic(&nan_view, &mask, ZonalStatistic::Sum).is_nan());
}

#[test]
fn test_rasterize_zone() {
    let gt = sample_transform();

    // Covers the pixel centers (1,5), (2,5), (1,4), (2,4): rows 0-1, cols 0-1
    let zone = rectangle(0.6, 3.5, 2.4, 5.4);
    let mask = rasterize_zone(&zone, &gt, 6, 6).unwrap();
    assert_eq!(mask.cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

    // 3x3 block in the lower-right corner
    let zone = rectangle(3.6, -0.4, 6.4, 2.4);
    let mask = rasterize_zone(&zone, &gt, 6, 6).unwrap();
    assert_eq!(mask.len(), 9);
    assert!(mask.cells.contains(&(3, 3)));
    assert!(mask.cells.contains(&(5, 5)));

    // Entirely outside the grid
    let zone = rectangle(100.0, 100.0, 110.0, 110.0);
    let mask = rasterize_zone(&zone, &gt, 6, 6).unwrap();
    assert!(mask.is_empty());
}

#[test]
fn test_rasterize_zone_with_hole() {
    let gt = sample_transform();

    // Outer ring around the whole grid, hole over the 2x2 upper-left block
    let outer = LineString::from(vec![
        (0.0, -1.0),
        (7.0, -1.0),
        (7.0, 6.0),
        (0.0, 6.0),
        (0.0, -1.0),
    ]);
    let hole = LineString::from(vec![
        (0.6, 3.5),
        (2.4, 3.5),
        (2.4, 5.4),
        (0.6, 5.4),
        (0.6, 3.5),
    ]);
    let zone = MultiPolygon(vec![Polygon::new(outer, vec![hole])]);

    let mask = rasterize_zone(&zone, &gt, 6, 6).unwrap();
    assert_eq!(mask.len(), 32);
    assert!(!mask.cells.contains(&(0, 0)));
    assert!(!mask.cells.contains(&(1, 1)));
    assert!(mask.cells.contains(&(0, 2)));
}

#[test]
fn test_decode_cf_time() {
    assert_eq!(
        decode_cf_time(0.0, "days since 2000-01-15").as_deref(),
        Some("2000-01-15")
    );
    assert_eq!(
        decode_cf_time(31.0, "days since 2000-01-15").as_deref(),
        Some("2000-02-15")
    );
    assert_eq!(
        decode_cf_time(12.0, "hours since 2000-01-01 00:00:00").as_deref(),
        Some("2000-01-01 12:00")
    );
    assert_eq!(
        decode_cf_time(90.0, "seconds since 2000-01-01T00:00:00Z").as_deref(),
        Some("2000-01-01 00:01:30")
    );

    // Fractional days
    assert_eq!(
        decode_cf_time(0.5, "days since 2000-01-01").as_deref(),
        Some("2000-01-01 12:00")
    );

    // Unrecognized forms fall through
    assert_eq!(decode_cf_time(3.0, "kelvin"), None);
    assert_eq!(decode_cf_time(3.0, "fortnights since 2000-01-01"), None);
    assert_eq!(decode_cf_time(3.0, "days since whenever"), None);
}

#[test]
fn test_parse_epsg() {
    assert_eq!(parse_epsg("EPSG:4326").unwrap(), 4326);
    assert_eq!(parse_epsg("epsg:3577").unwrap(), 3577);
    assert_eq!(parse_epsg("urn:ogc:def:crs:EPSG::3857").unwrap(), 3857);
    assert_eq!(parse_epsg("4283").unwrap(), 4283);
    assert_eq!(parse_epsg("  EPSG:32755  ").unwrap(), 32755);

    assert!(parse_epsg("WGS84").is_err());
    assert!(parse_epsg("EPSG:abc").is_err());
}

#[test]
fn test_proj_string_table() {
    assert!(proj_string_for_epsg(4326).unwrap().contains("longlat"));
    assert!(proj_string_for_epsg(3577).unwrap().contains("aea"));

    let utm_south = proj_string_for_epsg(32755).unwrap();
    assert!(utm_south.contains("+zone=55"));
    assert!(utm_south.contains("+south"));

    let utm_north = proj_string_for_epsg(32633).unwrap();
    assert!(utm_north.contains("+zone=33"));
    assert!(!utm_north.contains("+south"));

    let mga = proj_string_for_epsg(28355).unwrap();
    assert!(mga.contains("+zone=55"));
    assert!(mga.contains("GRS80"));

    assert!(proj_string_for_epsg(9999).is_none());

    assert!(is_geographic(4326));
    assert!(is_geographic(4283));
    assert!(!is_geographic(3577));
}

#[test]
fn test_coord_transformer_identity() {
    let transformer = CoordTransformer::new(4326, 4326).unwrap();
    assert!(transformer.is_identity());

    let (x, y) = transformer.transform(149.1, -35.3).unwrap();
    assert_eq!((x, y), (149.1, -35.3));
}

#[test]
fn test_coord_transformer_to_web_mercator() {
    let transformer = CoordTransformer::new(4326, 3857).unwrap();
    assert!(!transformer.is_identity());

    // One degree of longitude on the equator
    let (x, y) = transformer.transform(1.0, 0.0).unwrap();
    assert!((x - 111_319.490_793_27).abs() < 1e-2);
    assert!(y.abs() < 1e-6);

    // And back again
    let inverse = CoordTransformer::new(3857, 4326).unwrap();
    let (lon, lat) = inverse.transform(x, y).unwrap();
    assert!((lon - 1.0).abs() < 1e-9);
    assert!(lat.abs() < 1e-9);
}

#[test]
fn test_coord_transformer_unsupported() {
    let err = CoordTransformer::new(4326, 9999).unwrap_err();
    assert!(format!("{}", err).contains("EPSG:9999"));
}

#[test]
fn test_polygon_layer_from_geojson() {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "north", "id": 1},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "south", "id": 2},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0], [5.0, 5.0]]],
                        [[[8.0, 8.0], [9.0, 8.0], [9.0, 9.0], [8.0, 9.0], [8.0, 8.0]]]
                    ]
                }
            }
        ]
    }"#;

    let layer = PolygonLayer::from_geojson_str(geojson, "name").unwrap();
    assert_eq!(layer.len(), 2);
    assert_eq!(layer.labels(), vec!["north", "south"]);
    assert_eq!(layer.label_name, "name");
    // No crs member: GeoJSON defaults to WGS84
    assert_eq!(layer.epsg, 4326);
    assert_eq!(layer.features[1].geometry.0.len(), 2);

    // Numeric labels are rendered as strings
    let by_id = PolygonLayer::from_geojson_str(geojson, "id").unwrap();
    assert_eq!(by_id.labels(), vec!["1", "2"]);
}

#[test]
fn test_polygon_layer_crs_member() {
    let geojson = r#"{
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3577"}},
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "a"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }
        ]
    }"#;

    let layer = PolygonLayer::from_geojson_str(geojson, "name").unwrap();
    assert_eq!(layer.epsg, 3577);
}

#[test]
fn test_polygon_layer_errors() {
    // Missing label attribute
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"other": "x"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }
        ]
    }"#;
    let err = PolygonLayer::from_geojson_str(geojson, "name").unwrap_err();
    assert!(matches!(err, RuZonalError::AttributeNotFound { .. }));

    // Unsupported geometry type
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "pt"},
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
            }
        ]
    }"#;
    let err = PolygonLayer::from_geojson_str(geojson, "name").unwrap_err();
    assert!(format!("{}", err).contains("unsupported geometry type 'Point'"));

    // Not a FeatureCollection
    let err = PolygonLayer::from_geojson_str(r#"{"type": "Feature"}"#, "name").unwrap_err();
    assert!(matches!(err, RuZonalError::GeoJsonError(_)));
}

#[test]
fn test_polygon_layer_reproject_identity() {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "a"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[149.0, -35.0], [149.1, -35.0], [149.1, -35.1], [149.0, -35.0]]]
                }
            }
        ]
    }"#;

    let mut layer = PolygonLayer::from_geojson_str(geojson, "name").unwrap();
    let before = layer.features[0].geometry.clone();
    layer.reproject(4326).unwrap();
    assert_eq!(layer.features[0].geometry, before);
    assert_eq!(layer.epsg, 4326);
}

#[test]
fn test_sanitize_label() {
    assert_eq!(sanitize_label("Upper Creek"), "Upper_Creek");
    assert_eq!(sanitize_label("zone/7:a"), "zone_7_a");
    assert_eq!(sanitize_label("plain-name_1.2"), "plain-name_1.2");
    assert_eq!(sanitize_label(""), "unnamed");
}
