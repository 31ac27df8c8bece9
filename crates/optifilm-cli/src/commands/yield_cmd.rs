use super::cancel_on_ctrl_c;
use crate::cli::YieldArgs;
use crate::config::{FileConfig, build_yield_config};
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use optifilm::engine::progress::ProgressReporter;
use optifilm::workflows::{self, yield_analysis::YieldResult};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(args: YieldArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let file = FileConfig::from_file(&args.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = build_yield_config(file, &args)?;

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let cancellation = cancel_on_ctrl_c();

    println!(
        "Simulating {} deposition run(s) of a {}-layer stack...",
        config.num_runs,
        config.layers.len()
    );
    let result = tokio::task::block_in_place(|| {
        workflows::yield_analysis::run(&config, &reporter, &cancellation)
    })?;

    if let Some(output) = &args.output {
        write_report(&result, output)?;
        println!("✓ Yield report written to: {}", output.display());
    }
    print_summary(&result);
    Ok(())
}

fn write_report(result: &YieldResult, path: &Path) -> Result<()> {
    let content = render_report(result).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    std::fs::write(path, content)?;
    Ok(())
}

fn render_report(result: &YieldResult) -> std::result::Result<String, toml::ser::Error> {
    toml::to_string_pretty(result)
}

fn print_summary(result: &YieldResult) {
    println!(
        "Yield: {:.1}% ({} passed, {} failed of {})",
        result.pass_rate, result.passed_runs, result.failed_runs, result.total_runs
    );
    println!(
        "  Error best {:.3}, average {:.3}, worst {:.3}",
        result.best_error, result.average_error, result.worst_error
    );

    let widest = result.histogram.iter().map(|bin| bin.count).max().unwrap_or(0);
    for bin in &result.histogram {
        let width = if widest == 0 { 0 } else { bin.count * 40 / widest };
        println!(
            "  [{:8.3}, {:8.3}) {:>6} {}",
            bin.lower,
            bin.upper,
            bin.count,
            "#".repeat(width)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optifilm::core::materials::MaterialId;
    use optifilm::core::models::layer::Layer;
    use optifilm::core::models::stack::Media;
    use optifilm::core::models::target::TargetWindow;
    use optifilm::engine::config::YieldConfigBuilder;
    use optifilm::engine::progress::CancellationToken;

    fn small_result() -> YieldResult {
        let config = YieldConfigBuilder::new()
            .layers(vec![
                Layer::new(MaterialId::SiO2, 148.42),
                Layer::new(MaterialId::ZrO2, 30.16),
            ])
            .media(Media::new(1.0, 1.5))
            .add_target(TargetWindow::at_wavelength(550.0, 0.0, 5.0))
            .num_runs(40)
            .seed(11)
            .build()
            .unwrap();
        workflows::yield_analysis::run(
            &config,
            &ProgressReporter::new(),
            &CancellationToken::new(),
        )
        .unwrap()
    }

    #[test]
    fn report_renders_statistics_and_examples_as_toml() {
        let result = small_result();
        let rendered = render_report(&result).unwrap();
        let parsed: toml::Table = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed["total_runs"].as_integer(), Some(40));
        assert_eq!(parsed["histogram"].as_array().unwrap().len(), result.histogram.len());
        assert!(parsed.contains_key("passed_examples"));
    }

    #[test]
    fn report_is_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yield.toml");
        write_report(&small_result(), &path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("pass_rate"));
    }
}
