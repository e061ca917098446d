//! Centralized error handling for RuZonal
//!
//! This module provides structured error types so that every stage of the
//! extraction pipeline reports a typed failure instead of a generic
//! `Box<dyn Error>`, enabling better error context and type safety.

use std::fmt;

/// Main error type for RuZonal operations
#[derive(Debug)]
pub enum RuZonalError {
    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// CSV export errors
    CsvError(csv::Error),

    /// Plot rendering or encoding errors
    ImageError(image::ImageError),

    /// Variable not found in NetCDF file
    VariableNotFound { var: String },

    /// Dimension not found in variable
    DimensionNotFound { var: String, dim: String },

    /// Malformed coordinate input for transform derivation
    CoordinateError(String),

    /// CRS descriptor could not be parsed or is unsupported
    CrsError(String),

    /// Coordinate reprojection failure
    ProjectionError(String),

    /// Polygon layer source could not be parsed
    GeoJsonError(String),

    /// Label attribute missing from a polygon feature
    AttributeNotFound { attribute: String },

    /// Statistics computation errors
    StatisticsError(String),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Generic error for everything else
    Generic(String),
}

impl fmt::Display for RuZonalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuZonalError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            RuZonalError::IoError(e) => write!(f, "I/O error: {}", e),
            RuZonalError::ArrayError(e) => write!(f, "Array error: {}", e),
            RuZonalError::CsvError(e) => write!(f, "CSV error: {}", e),
            RuZonalError::ImageError(e) => write!(f, "Image error: {}", e),
            RuZonalError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in file", var)
            }
            RuZonalError::DimensionNotFound { var, dim } => {
                write!(f, "Dimension '{}' not found in variable '{}'", dim, var)
            }
            RuZonalError::CoordinateError(msg) => write!(f, "Coordinate error: {}", msg),
            RuZonalError::CrsError(msg) => write!(f, "CRS error: {}", msg),
            RuZonalError::ProjectionError(msg) => write!(f, "Projection error: {}", msg),
            RuZonalError::GeoJsonError(msg) => write!(f, "GeoJSON error: {}", msg),
            RuZonalError::AttributeNotFound { attribute } => {
                write!(f, "Attribute '{}' not found in polygon layer", attribute)
            }
            RuZonalError::StatisticsError(msg) => {
                write!(f, "Statistics computation error: {}", msg)
            }
            RuZonalError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            RuZonalError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RuZonalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuZonalError::NetCDFError(e) => Some(e),
            RuZonalError::IoError(e) => Some(e),
            RuZonalError::ArrayError(e) => Some(e),
            RuZonalError::CsvError(e) => Some(e),
            RuZonalError::ImageError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for RuZonalError {
    fn from(error: netcdf::Error) -> Self {
        RuZonalError::NetCDFError(error)
    }
}

impl From<std::io::Error> for RuZonalError {
    fn from(error: std::io::Error) -> Self {
        RuZonalError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for RuZonalError {
    fn from(error: ndarray::ShapeError) -> Self {
        RuZonalError::ArrayError(error)
    }
}

impl From<csv::Error> for RuZonalError {
    fn from(error: csv::Error) -> Self {
        RuZonalError::CsvError(error)
    }
}

impl From<image::ImageError> for RuZonalError {
    fn from(error: image::ImageError) -> Self {
        RuZonalError::ImageError(error)
    }
}

impl From<serde_json::Error> for RuZonalError {
    fn from(error: serde_json::Error) -> Self {
        RuZonalError::GeoJsonError(error.to_string())
    }
}

impl From<String> for RuZonalError {
    fn from(error: String) -> Self {
        RuZonalError::Generic(error)
    }
}

impl From<&str> for RuZonalError {
    fn from(error: &str) -> Self {
        RuZonalError::Generic(error.to_string())
    }
}

/// Result type alias for RuZonal operations
pub type Result<T> = std::result::Result<T, RuZonalError>;
