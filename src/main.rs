//! Entry point for the RuZonal application.
//! Handles CLI parsing, file loading, and dispatches metadata inspection or zonal extraction.

use clap::Parser;
use netcdf::open;

use ru_zonal::cli::Args;
use ru_zonal::metadata::{
    describe_variable, find_cube_variables, list_variables_and_dimensions, print_metadata,
};
use ru_zonal::parallel::{get_parallel_info, ParallelConfig};
use ru_zonal::timeseries::{zonal_timeseries_from_files, ZonalOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = Args::parse();

    println!(
        r#"
------------------------------------------------------------------
            ______         ______                       _
            | ___ \       |___  /                      | |
            | |_/ / _   _    / /   ___   _ __    __ _  | |
            |    / | | | |  / /   / _ \ | '_ \  / _` | | |
            | |\ \ | |_| |./ /___| (_) || | | || (_| | | |
            \_| \_| \__,_|\_____/ \___/ |_| |_| \__,_| |_|
                  Rust-based zonal statistics tool
------------------------------------------------------------------
                        "#
    );

    let parallel_config = ParallelConfig::new(args.threads);
    parallel_config.setup_global_pool()?;

    if args.verbose {
        get_parallel_info().print_info();
    }

    // Open NetCDF file
    let file = open(&args.file)?;
    println!("Successfully opened NetCDF file: {}", args.file.display());

    if args.list_vars {
        list_variables_and_dimensions(&file)?;
        return Ok(());
    }

    if let Some(var_name) = &args.describe {
        describe_variable(&file, var_name)?;
        return Ok(());
    }

    match (&args.polygons, &args.label) {
        (Some(polygons_path), Some(label)) => {
            let options = ZonalOptions {
                statistic: args.stat,
                chunk_size: args.chunk_size,
                export_csv: args.csv,
                export_netcdf: args.netcdf,
                export_plot: args.plot,
            };

            let table = zonal_timeseries_from_files(
                &args.file,
                args.variable.as_deref(),
                polygons_path,
                label,
                &args.results_dir,
                &options,
            )?;

            if !(args.csv || args.netcdf || args.plot) {
                print_table_preview(&table);
                println!("\n💡 Tip: Use --csv, --netcdf, or --plot to export the results");
            }
        }
        (None, None) => {
            // No extraction requested; show what the file contains
            print_metadata(&file)?;

            let cubes = find_cube_variables(&file);
            if !cubes.is_empty() {
                println!(
                    "\n💡 Cube variables available for extraction: {}",
                    cubes.join(", ")
                );
                println!("💡 Tip: Add --polygons <file.geojson> --label <attribute> to extract a zonal time series");
            }
        }
        _ => {
            return Err(
                "both --polygons and --label are required to extract a zonal time series".into(),
            );
        }
    }

    Ok(())
}

/// Prints the first rows of a result table to the terminal.
fn print_table_preview(table: &ru_zonal::table::StatTable) {
    const MAX_ZONES: usize = 10;
    const MAX_TIMES: usize = 6;

    println!(
        "\nResult table: {} zones × {} time steps ({})",
        table.n_zones(),
        table.n_times(),
        table.statistic
    );

    for (i, label) in table.labels.iter().enumerate().take(MAX_ZONES) {
        let row = table.values.row(i);
        let mut shown: Vec<String> = row
            .iter()
            .take(MAX_TIMES)
            .map(|v| format!("{:.4}", v))
            .collect();
        if table.n_times() > MAX_TIMES {
            shown.push(format!("... ({} more)", table.n_times() - MAX_TIMES));
        }
        println!("   {}: [{}]", label, shown.join(", "));
    }
    if table.n_zones() > MAX_ZONES {
        println!("   ... ({} more zones)", table.n_zones() - MAX_ZONES);
    }
}
