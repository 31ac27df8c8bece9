use crate::engine::config::YieldConfig;
use crate::engine::context::OptimizationContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use crate::engine::state::BoundedBest;
use crate::engine::tasks::yield_eval::{self, RunOutcome, VirtualRun};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const PHASE: &str = "Monte Carlo";
const CHECKPOINT_INTERVAL: usize = 50;
pub const HISTOGRAM_BINS: usize = 10;
pub const RETAINED_EXAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunExample {
    pub run_index: usize,
    pub error: f64,
    pub run: VirtualRun,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldResult {
    pub total_runs: usize,
    pub passed_runs: usize,
    pub failed_runs: usize,
    /// Percentage of runs inside every target band.
    pub pass_rate: f64,
    pub best_error: f64,
    pub average_error: f64,
    pub worst_error: f64,
    pub histogram: Vec<HistogramBin>,
    /// Lowest-error passing runs, best first.
    pub passed_examples: Vec<RunExample>,
    /// Highest-error failing runs, worst first.
    pub failed_examples: Vec<RunExample>,
}

/// Simulates `config.num_runs` perturbed depositions and aggregates pass/fail statistics.
///
/// Uses `config.seed` when set, otherwise an entropy-seeded generator.
#[instrument(skip_all, name = "yield_workflow")]
pub fn run(
    config: &YieldConfig,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<YieldResult, EngineError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run_with_rng(config, reporter, cancellation, &mut rng)
}

pub fn run_with_rng(
    config: &YieldConfig,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
    rng: &mut impl Rng,
) -> Result<YieldResult, EngineError> {
    let context = OptimizationContext::new(config, reporter, cancellation);
    info!(
        runs = config.num_runs,
        layers = config.layers.len(),
        targets = config.targets.len(),
        "Starting Monte Carlo yield simulation."
    );
    reporter.report(Progress::PhaseStart { name: PHASE });

    let total = config.num_runs;
    let mut errors = Vec::with_capacity(total);
    let mut passed_runs = 0;
    let mut passed_examples = BoundedBest::lowest(RETAINED_EXAMPLES);
    let mut failed_examples = BoundedBest::highest(RETAINED_EXAMPLES);

    let mut completed = 0;
    while completed < total {
        context.checkpoint(PHASE, completed as f64 / total as f64 * 100.0)?;
        let batch_len = CHECKPOINT_INTERVAL.min(total - completed);

        let runs: Vec<VirtualRun> = (0..batch_len)
            .map(|_| {
                yield_eval::perturb(rng, &config.layers, &config.tooling, &config.perturbation)
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let iterator = runs.iter();

        #[cfg(feature = "parallel")]
        let iterator = runs.par_iter();

        let outcomes: Vec<RunOutcome> = iterator
            .map(|run| yield_eval::evaluate(run, &config.targets, &config.media))
            .collect();

        for (offset, (run, outcome)) in runs.into_iter().zip(outcomes).enumerate() {
            let run_index = completed + offset;
            errors.push(outcome.error);
            let example = || RunExample {
                run_index,
                error: outcome.error,
                run,
            };
            if outcome.passed {
                passed_runs += 1;
                passed_examples.offer_with(outcome.error, example);
            } else {
                failed_examples.offer_with(outcome.error, example);
            }
        }
        completed += batch_len;
    }
    context.checkpoint(PHASE, 100.0)?;

    let best_error = errors.iter().copied().fold(f64::INFINITY, f64::min);
    let worst_error = errors.iter().copied().fold(0.0, f64::max);
    let average_error = errors.iter().sum::<f64>() / total as f64;
    let pass_rate = passed_runs as f64 / total as f64 * 100.0;

    info!(
        passed = passed_runs,
        total,
        pass_rate,
        worst_error,
        "Monte Carlo yield simulation finished."
    );
    reporter.report(Progress::PhaseFinish);

    Ok(YieldResult {
        total_runs: total,
        passed_runs,
        failed_runs: total - passed_runs,
        pass_rate,
        best_error,
        average_error,
        worst_error,
        histogram: error_histogram(&errors, best_error, worst_error),
        passed_examples: into_examples(passed_examples),
        failed_examples: into_examples(failed_examples),
    })
}

fn into_examples(set: BoundedBest<RunExample>) -> Vec<RunExample> {
    set.into_sorted_vec()
        .into_iter()
        .map(|entry| entry.item)
        .collect()
}

/// Equal-width bins over `[best, worst]`; the last bin is closed. A zero-width range puts
/// everything in the first bin.
fn error_histogram(errors: &[f64], best: f64, worst: f64) -> Vec<HistogramBin> {
    let width = (worst - best) / HISTOGRAM_BINS as f64;
    let mut bins: Vec<HistogramBin> = (0..HISTOGRAM_BINS)
        .map(|i| HistogramBin {
            lower: best + i as f64 * width,
            upper: best + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &error in errors {
        let index = if width > 0.0 {
            (((error - best) / width).floor() as usize).min(HISTOGRAM_BINS - 1)
        } else {
            0
        };
        bins[index].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialId;
    use crate::core::models::layer::Layer;
    use crate::core::models::target::TargetWindow;
    use crate::engine::config::YieldConfigBuilder;
    use std::sync::Mutex;

    fn design() -> Vec<Layer> {
        vec![
            Layer::new(MaterialId::SiO2, 148.42),
            Layer::new(MaterialId::ZrO2, 30.16),
            Layer::new(MaterialId::SiO2, 23.68),
            Layer::new(MaterialId::ZrO2, 61.29),
            Layer::new(MaterialId::SiO2, 88.03),
        ]
    }

    fn silent() -> (ProgressReporter<'static>, CancellationToken) {
        (ProgressReporter::new(), CancellationToken::new())
    }

    #[test]
    fn exact_process_passes_every_run() {
        let config = YieldConfigBuilder::new()
            .layers(design())
            .add_target(TargetWindow::new(500.0, 600.0, 0.0, 10.0))
            .num_runs(120)
            .thickness_error_percent(0.0)
            .ri_error_percent(0.0)
            .tooling_error_percent(0.0)
            .seed(1)
            .build()
            .unwrap();
        let (reporter, token) = silent();
        let result = run(&config, &reporter, &token).unwrap();

        assert_eq!(result.pass_rate, 100.0);
        assert_eq!(result.passed_runs, 120);
        assert_eq!(result.failed_runs, 0);
        assert_eq!(result.worst_error, 0.0);
        assert_eq!(result.histogram[0].count, 120);
        assert_eq!(result.passed_examples.len(), RETAINED_EXAMPLES);
        assert_eq!(result.passed_examples[0].run_index, 0);
        assert!(result.failed_examples.is_empty());
    }

    #[test]
    fn seeded_runs_are_reproducible_and_consistent() {
        let config = YieldConfigBuilder::new()
            .layers(design())
            .add_target(TargetWindow::at_wavelength(550.0, 0.0, 1.75))
            .num_runs(300)
            .thickness_error_percent(5.0)
            .seed(77)
            .build()
            .unwrap();
        let (reporter, token) = silent();
        let first = run(&config, &reporter, &token).unwrap();
        let second = run(&config, &reporter, &token).unwrap();
        assert_eq!(first, second);

        assert_eq!(first.passed_runs + first.failed_runs, 300);
        let binned: usize = first.histogram.iter().map(|bin| bin.count).sum();
        assert_eq!(binned, 300);
        assert!(first.best_error <= first.average_error);
        assert!(first.average_error <= first.worst_error);
        for pair in first.failed_examples.windows(2) {
            assert!(pair[0].error >= pair[1].error);
        }
        if let Some(worst) = first.failed_examples.first() {
            assert_eq!(worst.error, first.worst_error);
        }
    }

    #[test]
    fn checkpoints_are_monotonic_and_finish_at_100() {
        let config = YieldConfigBuilder::new()
            .layers(design())
            .add_target(TargetWindow::new(450.0, 650.0, 0.0, 20.0))
            .num_runs(175)
            .seed(3)
            .build()
            .unwrap();
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Checkpoint { percent, .. } = event {
                seen.lock().unwrap().push(percent);
            }
        }));
        run(&config, &reporter, &CancellationToken::new()).unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.first(), Some(&0.0));
        assert_eq!(seen.last(), Some(&100.0));
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn cancelled_token_aborts_before_first_run() {
        let config = YieldConfigBuilder::new()
            .layers(design())
            .add_target(TargetWindow::at_wavelength(550.0, 0.0, 5.0))
            .num_runs(10)
            .build()
            .unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = run(&config, &ProgressReporter::new(), &token);
        assert!(matches!(result, Err(EngineError::Cancelled { phase: PHASE })));
    }

    #[test]
    fn histogram_spreads_errors_over_ten_bins() {
        let errors = [0.0, 1.0, 2.5, 5.0, 9.99, 10.0];
        let bins = error_histogram(&errors, 0.0, 10.0);
        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 1);
        assert_eq!(bins[2].count, 1);
        assert_eq!(bins[5].count, 1);
        assert_eq!(bins[9].count, 2);
        assert_eq!(bins[9].upper, 10.0);
    }
}
