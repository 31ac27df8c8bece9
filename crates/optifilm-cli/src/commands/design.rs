use super::{cancel_on_ctrl_c, load_reference};
use crate::cli::DesignArgs;
use crate::config::{FileConfig, build_design_config};
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use optifilm::core::io::{SpectrumCsv, SpectrumFile};
use optifilm::engine::progress::ProgressReporter;
use optifilm::workflows::{self, design::DesignSolution};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Serialize)]
struct SolutionsReport<'a> {
    solutions: &'a [DesignSolution],
}

pub async fn run(args: DesignArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let file = FileConfig::from_file(&args.config)?;
    let reference = args.reference.as_deref().map(load_reference).transpose()?;
    info!("Merging configuration from file and CLI arguments...");
    let config = build_design_config(file, &args, reference)?;

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let cancellation = cancel_on_ctrl_c();

    println!(
        "Designing a {}-layer stack ({} search iterations)...",
        config.layer_count, config.search.iterations
    );
    let solutions = tokio::task::block_in_place(|| {
        workflows::design::run(&config, &reporter, &cancellation)
    })?;
    info!("Workflow finished, received {} solution(s).", solutions.len());

    write_solutions(&solutions, &args.output)?;
    println!(
        "✓ {} solution(s) written to: {}",
        solutions.len(),
        args.output.display()
    );

    if args.write_curves {
        for (i, solution) in solutions.iter().enumerate() {
            let path = curve_output_path(&args.output, i + 1);
            SpectrumCsv::write_to_path(&solution.curve, &path).map_err(|e| {
                CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                }
            })?;
            info!("Wrote reflectance curve of solution {} to {:?}", i + 1, &path);
        }
    }

    print_summary(&solutions);
    Ok(())
}

fn write_solutions(solutions: &[DesignSolution], path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SolutionsReport { solutions }).map_err(|e| {
        CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        }
    })?;
    std::fs::write(path, content)?;
    Ok(())
}

/// `designs.toml` becomes `designs_1.csv`, `designs_2.csv`, ...
fn curve_output_path(base: &Path, index: usize) -> PathBuf {
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    base.with_file_name(format!("{stem}_{index}.csv"))
}

fn print_summary(solutions: &[DesignSolution]) {
    if solutions.is_empty() {
        warn!("Design finished without solutions.");
        return;
    }
    for (i, solution) in solutions.iter().enumerate() {
        let stack = solution
            .layers
            .iter()
            .map(|layer| format!("{} {:.1}", layer.material, layer.thickness))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("  #{:<2} error {:8.4}  {}", i + 1, solution.error, stack);
    }
}
