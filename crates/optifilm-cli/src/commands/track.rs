use crate::cli::TrackArgs;
use crate::error::{CliError, Result};
use optifilm::core::analysis::tracking::TrackingPoint;
use optifilm::workflows::{self, tracking::TrackingResult};
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, PartialEq)]
struct TrackingRow {
    wavelength: f64,
    samples: usize,
    mean: Option<f64>,
    std_dev: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
}

impl From<&TrackingPoint> for TrackingRow {
    fn from(point: &TrackingPoint) -> Self {
        let stats = point.stats;
        Self {
            wavelength: point.wavelength,
            samples: point.runs.iter().flatten().count(),
            mean: stats.map(|s| s.mean),
            std_dev: stats.map(|s| s.std_dev),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
            lower_bound: stats.map(|s| s.lower_bound),
            upper_bound: stats.map(|s| s.upper_bound),
        }
    }
}

pub async fn run(args: TrackArgs) -> Result<()> {
    info!("Tracking {} measured run(s).", args.runs.len());
    let result = tokio::task::block_in_place(|| workflows::tracking::run(&args.runs))?;

    if let Some(output) = &args.output {
        write_statistics(&result, output)?;
        println!("✓ Tracking statistics written to: {}", output.display());
    }

    println!(
        "Tracked {} run(s) over {} wavelength(s).",
        result.run_count,
        result.points.len()
    );
    match result.average_std_dev {
        Some(spread) => println!("  Average run-to-run deviation: {:.3}%", spread),
        None => println!("  No wavelength is shared by the runs."),
    }
    Ok(())
}

fn write_statistics(result: &TrackingResult, path: &Path) -> Result<()> {
    let parse_error = |e: csv::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(parse_error)?;
    for point in &result.points {
        writer.serialize(TrackingRow::from(point)).map_err(parse_error)?;
    }
    writer.flush()?;
    Ok(())
}
