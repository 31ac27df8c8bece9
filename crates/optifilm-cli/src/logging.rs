use crate::error::Result;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
};

const OWN_TARGETS: [&str; 2] = ["optifilm", "optifilm_cli"];

fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Our own crates log at the requested level; dependencies never go below WARN.
fn target_filter(level: LevelFilter) -> Targets {
    OWN_TARGETS
        .iter()
        .fold(Targets::new(), |targets, name| targets.with_target(*name, level))
        .with_default(level.min(LevelFilter::WARN))
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = level_for(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(target_filter(level));

    let subscriber = tracing_subscriber::registry().with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(path)?;

        // The file always records at least INFO so runs can be audited after the fact.
        let file_level = level.max(LevelFilter::INFO);
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true)
            .with_filter(target_filter(file_level));

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}
