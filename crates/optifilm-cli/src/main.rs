mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::ui::UiManager;
use clap::Parser;
use tokio::task;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    let (ui_manager, ui_sender, shutdown_sender) = UiManager::new();
    let ui_handle = task::spawn(ui_manager.run());

    let command_result = async {
        info!("OptiFilm CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
        debug!("Full CLI arguments parsed: {:?}", &cli);

        if let Some(num_threads) = cli.threads {
            info!(
                "Setting Rayon global thread pool to {} threads.",
                num_threads
            );
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
                })?;
        }

        match cli.command {
            Commands::Materials(args) => {
                info!("Dispatching to 'materials' command.");
                commands::materials::run(args)
            }
            Commands::Spectrum(args) => {
                info!("Dispatching to 'spectrum' command.");
                commands::spectrum::run(args).await
            }
            Commands::Yield(args) => {
                info!("Dispatching to 'yield' command.");
                commands::yield_cmd::run(args, ui_sender).await
            }
            Commands::Design(args) => {
                info!("Dispatching to 'design' command.");
                commands::design::run(args, ui_sender).await
            }
            Commands::Track(args) => {
                info!("Dispatching to 'track' command.");
                commands::track::run(args).await
            }
        }
    }
    .await;

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }

    if shutdown_sender.send(true).is_err() {
        warn!("UI manager may have already exited before shutdown signal.");
    }

    ui_handle
        .await
        .map_err(|e| CliError::Other(anyhow::anyhow!("UI manager task failed: {}", e)))?;

    command_result
}
