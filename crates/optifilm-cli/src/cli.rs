use clap::{Args, Parser, Subcommand};
use optifilm::core::analysis::adjust::LayerSelection;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "OptiFilm Developers",
    version,
    about = "OptiFilm CLI - Analyze, tolerance, and design multilayer thin-film optical coatings.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the built-in material catalog with refractive indices at a wavelength.
    Materials(MaterialsArgs),
    /// Compute the reflectance spectrum, color, and stress of a coating stack.
    Spectrum(SpectrumArgs),
    /// Estimate manufacturing yield with a Monte Carlo tolerance simulation.
    Yield(YieldArgs),
    /// Search for layer stacks that meet target windows or match a measured spectrum.
    Design(DesignArgs),
    /// Compute run-to-run statistics over several measured spectra.
    Track(TrackArgs),
}

/// Arguments for the `materials` subcommand.
#[derive(Args, Debug)]
pub struct MaterialsArgs {
    /// Wavelength in nm at which indices are reported.
    #[arg(short, long, default_value_t = 550.0, value_name = "NM")]
    pub wavelength: f64,
}

/// Wavelength grid overrides shared by several subcommands.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RangeOverrides {
    /// Override the lower end of the wavelength range (nm).
    #[arg(long = "min", value_name = "NM")]
    pub min: Option<f64>,

    /// Override the upper end of the wavelength range (nm).
    #[arg(long = "max", value_name = "NM")]
    pub max: Option<f64>,

    /// Override the wavelength step (nm).
    #[arg(long = "step", value_name = "NM")]
    pub step: Option<f64>,
}

/// Arguments for the `spectrum` subcommand.
#[derive(Args, Debug)]
pub struct SpectrumArgs {
    /// Path to the coating file in TOML format (layers, media, tooling).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path for the output CSV. With several angles, one file per angle is written.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Incidence angle in degrees. Can be used multiple times.
    #[arg(short, long = "angle", value_name = "DEG")]
    pub angles: Vec<f64>,

    /// Measured spectrum (CSV: wavelength,reflectivity) to compare against.
    #[arg(short, long, value_name = "PATH")]
    pub reference: Option<PathBuf>,

    #[command(flatten)]
    pub range: RangeOverrides,

    /// Multiply layer thicknesses by this factor before computing.
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f64>,

    /// Layers the scale factor applies to: all, odd, or even (1-based).
    #[arg(long, value_name = "LAYERS", default_value = "all")]
    pub scale_layers: LayerSelection,

    /// Rescale every thickness so spectral features move by this many nm.
    #[arg(long, value_name = "NM", allow_negative_numbers = true)]
    pub shift: Option<f64>,

    /// Preview the written curves moved up (or down) by this many percentage points.
    #[arg(long, value_name = "PCT", allow_negative_numbers = true)]
    pub vertical_shift: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S media.substrate=1.45
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `yield` subcommand.
#[derive(Args, Debug)]
pub struct YieldArgs {
    /// Path to the job file in TOML format (layers, targets, monte-carlo settings).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Write the full report (statistics, histogram, example runs) as TOML.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override the number of simulated runs.
    #[arg(short = 'n', long, value_name = "INT")]
    pub runs: Option<usize>,

    /// Seed the random generator for a reproducible simulation.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S monte-carlo.thickness-error=1.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Path to the job file in TOML format (targets, design settings, media).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path for the solutions file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Reverse-engineer from a measured spectrum (CSV) instead of target windows.
    #[arg(short, long, value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Override the number of designed layers.
    #[arg(short = 'l', long, value_name = "INT")]
    pub layers: Option<usize>,

    /// Override the number of random-search iterations.
    #[arg(long, value_name = "INT")]
    pub iterations: Option<usize>,

    /// Override the maximum number of solutions to return.
    #[arg(short, long, value_name = "INT")]
    pub num_solutions: Option<usize>,

    /// Seed the random generator for a reproducible search.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Write each solution's reflectance curve next to the solutions file as CSV.
    #[arg(long)]
    pub write_curves: bool,

    #[command(flatten)]
    pub range: RangeOverrides,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S design.smoothness-weight=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `track` subcommand.
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Measured runs (CSV: wavelength,reflectivity), one file per run.
    #[arg(required = true, num_args = 1.., value_name = "CSV")]
    pub runs: Vec<PathBuf>,

    /// Write the per-wavelength statistics as CSV.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
