//! NetCDF metadata inspection and variable description functionality
//!
//! Lets users look inside a NetCDF file before extracting anything:
//! list dimensions and variables, describe a single variable, and find
//! the variables that qualify as raster cubes.

use crate::errors::{Result, RuZonalError};
use netcdf::{AttributeValue, File};

/// Prints global attributes and variables of a NetCDF file.
pub fn print_metadata(file: &File) -> Result<()> {
    println!("\n===== Global Attributes =====");
    for attr in file.attributes() {
        println!("- {}: {}", attr.name(), format_attribute(&attr.value()?));
    }

    println!("\n===== Variables =====");
    for var in file.variables() {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| format!("{}[{}]", d.name(), d.len()))
            .collect();
        println!("- {} ({})", var.name(), dims.join(", "));
    }

    Ok(())
}

/// Lists all variables and dimensions in a clean, organized format.
pub fn list_variables_and_dimensions(file: &File) -> Result<()> {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by(|a, b| a.name().cmp(&b.name()));

    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    } else {
        for dim in dimensions {
            let length_info = if dim.is_unlimited() {
                format!("{} (unlimited)", dim.len())
            } else {
                dim.len().to_string()
            };
            println!("    {} = {}", dim.name(), length_info);
        }
    }

    println!("\n Variables");
    println!("=============");

    let mut variables: Vec<_> = file.variables().collect();
    variables.sort_by(|a, b| a.name().cmp(&b.name()));

    if variables.is_empty() {
        println!("   (No variables found)");
    } else {
        for var in variables {
            let data_type = format!("{:?}", var.vartype()).to_lowercase();

            let dims: Vec<String> = var
                .dimensions()
                .iter()
                .map(|d| d.name().to_string())
                .collect();

            let shape: Vec<String> = var
                .dimensions()
                .iter()
                .map(|d| d.len().to_string())
                .collect();

            if dims.is_empty() {
                println!("    {} ({}): scalar", var.name(), data_type);
            } else {
                println!(
                    "    {} ({}): [{}] = ({})",
                    var.name(),
                    data_type,
                    dims.join(", "),
                    shape.join(" × ")
                );
            }

            // Surface the attributes users actually look for
            let mut key_attrs = Vec::new();
            for name in ["units", "long_name", "crs"] {
                if let Some(attr) = var.attribute(name) {
                    if let Ok(AttributeValue::Str(value)) = attr.value() {
                        key_attrs.push(format!("{}: {}", name, value));
                    }
                }
            }
            if !key_attrs.is_empty() {
                println!("      └─ {}", key_attrs.join(", "));
            }
        }
    }

    println!("\n💡 Tip: Use --polygons <file.geojson> --label <attribute> to extract a zonal time series");
    println!("💡 Tip: Use --threads <N> to control parallel processing threads");

    Ok(())
}

/// Describes a specific variable showing its data type, shape, and all attributes.
pub fn describe_variable(file: &File, var_name: &str) -> Result<()> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| RuZonalError::VariableNotFound {
            var: var_name.to_string(),
        })?;

    println!("\n Variable Description: {}", var_name);
    println!("={}", "=".repeat(var_name.len() + 25));

    let data_type = format!("{:?}", var.vartype()).to_lowercase();
    println!(" Data type: {}", data_type);

    let dims: Vec<String> = var
        .dimensions()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|dim| dim.len()).collect();

    if dims.is_empty() {
        println!(" Dimensions: (scalar)");
        println!(" Shape: ()");
    } else {
        println!(" Dimensions: [{}]", dims.join(", "));
        println!(
            " Shape: ({})",
            shape
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" × ")
        );

        println!("\n Dimension Details:");
        for dim in var.dimensions() {
            let length_info = if dim.is_unlimited() {
                format!("{} (unlimited)", dim.len())
            } else {
                dim.len().to_string()
            };
            println!("    {} = {}", dim.name(), length_info);
        }
    }

    let attributes: Vec<_> = var.attributes().collect();
    if attributes.is_empty() {
        println!("\n  Attributes: (none)");
    } else {
        println!("\n  Attributes:");
        for attr in attributes {
            match attr.value() {
                Ok(value) => println!("   • {}: {}", attr.name(), format_attribute(&value)),
                Err(e) => println!("   • {}: (error reading value: {})", attr.name(), e),
            }
        }
    }

    let total_elements: usize = shape.iter().product();
    let element_size = estimate_element_size(&data_type);
    let total_bytes = total_elements * element_size;

    println!("\n Storage Information:");
    println!("    Total elements: {}", total_elements);
    println!("    Element size: {} bytes", element_size);
    println!("    Total size: {}", humanize_bytes(total_bytes));

    if shape.len() == 3 {
        println!(
            "\n💡 Tip: Use --variable {} --polygons <file.geojson> to extract a zonal time series",
            var_name
        );
    }

    Ok(())
}

/// Names of the variables that can serve as raster cubes (three dimensions).
pub fn find_cube_variables(file: &File) -> Vec<String> {
    let mut names: Vec<String> = file
        .variables()
        .filter(|v| v.dimensions().len() == 3)
        .map(|v| v.name().to_string())
        .collect();
    names.sort();
    names
}

/// Renders an attribute value for display.
fn format_attribute(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => format!("\"{}\"", s),
        AttributeValue::Strs(ss) => format!("{:?}", ss),
        AttributeValue::Float(v) => v.to_string(),
        AttributeValue::Floats(vs) => format!("{:?}", vs),
        AttributeValue::Double(v) => v.to_string(),
        AttributeValue::Doubles(vs) => format!("{:?}", vs),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Ints(vs) => format!("{:?}", vs),
        AttributeValue::Short(v) => v.to_string(),
        AttributeValue::Shorts(vs) => format!("{:?}", vs),
        AttributeValue::Uchar(v) => v.to_string(),
        AttributeValue::Uchars(vs) => format!("{:?}", vs),
        AttributeValue::Ushort(v) => v.to_string(),
        AttributeValue::Ushorts(vs) => format!("{:?}", vs),
        AttributeValue::Uint(v) => v.to_string(),
        AttributeValue::Uints(vs) => format!("{:?}", vs),
        other => format!("{:?}", other),
    }
}

/// Element size guessed from the lowercased type name.
fn estimate_element_size(data_type: &str) -> usize {
    if data_type.contains("double") {
        8
    } else if data_type.contains("short") || data_type.contains("ushort") {
        2
    } else {
        4
    }
}

/// Byte counts formatted for humans.
fn humanize_bytes(total_bytes: usize) -> String {
    if total_bytes < 1024 {
        format!("{} bytes", total_bytes)
    } else if total_bytes < 1024 * 1024 {
        format!("{:.2} KB", total_bytes as f64 / 1024.0)
    } else if total_bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", total_bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", total_bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
