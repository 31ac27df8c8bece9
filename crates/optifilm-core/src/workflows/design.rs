use crate::core::models::layer::Layer;
use crate::core::models::spectrum::SpectralPoint;
use crate::core::optics::sweep;
use crate::engine::config::DesignConfig;
use crate::engine::context::OptimizationContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{CancellationToken, Progress, ProgressReporter};
use crate::engine::state::{BoundedBest, Scored};
use crate::engine::tasks::generation::{MaterialPools, random_candidate};
use crate::engine::tasks::refinement::refine_candidate;
use crate::engine::tasks::scoring::{ObjectiveScorer, ScoringPhase};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const SEARCH_PHASE: &str = "Random Search";
const REFINEMENT_PHASE: &str = "Refinement";
const FINALIZE_PHASE: &str = "Finalizing";

const SEARCH_BATCH: usize = 200;
const REFINEMENT_BATCH: usize = 8;

const SEARCH_END_PERCENT: f64 = 30.0;
const REFINEMENT_END_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignSolution {
    /// Full stack, adhesion layer (if any) first.
    pub layers: Vec<Layer>,
    pub error: f64,
    /// Normal-incidence response over the design domain.
    pub curve: Vec<SpectralPoint>,
}

type Candidate = Scored<Vec<Layer>>;

/// Searches for layer stacks that meet the configured objective.
///
/// Runs a broad random search, refines the best candidates with shrinking thickness
/// jitter, and returns up to `num_solutions` designs whose score is below the acceptance
/// threshold, best first.
#[instrument(skip_all, name = "design_workflow")]
pub fn run(
    config: &DesignConfig,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<Vec<DesignSolution>, EngineError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run_with_rng(config, reporter, cancellation, &mut rng)
}

pub fn run_with_rng(
    config: &DesignConfig,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
    rng: &mut impl Rng,
) -> Result<Vec<DesignSolution>, EngineError> {
    let pools = MaterialPools::partition(&config.materials)?;
    let context = OptimizationContext::new(config, reporter, cancellation);
    let scorer = ObjectiveScorer::new(config);
    let mut finalists = BoundedBest::lowest(config.num_solutions);

    info!(
        layers = config.layer_count,
        reverse = config.objective.is_reverse_engineering(),
        iterations = config.search.iterations,
        "Starting design optimization."
    );

    // === Phase 1: Broad random search ===
    let candidates = broad_search(&context, &scorer, &pools, rng, &mut finalists)?;

    // === Phase 2: Local refinement of the best candidates ===
    refine_all(&context, &scorer, candidates, rng, &mut finalists)?;

    // === Phase 3: Acceptance and curves ===
    finalize(&context, finalists)
}

fn broad_search(
    context: &OptimizationContext<DesignConfig>,
    scorer: &ObjectiveScorer,
    pools: &MaterialPools,
    rng: &mut impl Rng,
    finalists: &mut BoundedBest<Vec<Layer>>,
) -> Result<Vec<Candidate>, EngineError> {
    let config = context.config;
    context.reporter.report(Progress::PhaseStart { name: SEARCH_PHASE });

    let total = config.search.iterations;
    let mut pool = BoundedBest::lowest(config.search.top_candidates);
    let mut completed = 0;

    while completed < total {
        context.checkpoint(
            SEARCH_PHASE,
            completed as f64 / total as f64 * SEARCH_END_PERCENT,
        )?;
        let batch_len = SEARCH_BATCH.min(total - completed);
        let batch: Vec<Vec<Layer>> = (0..batch_len)
            .map(|_| {
                random_candidate(
                    rng,
                    pools,
                    config.layer_count,
                    &config.search,
                    config.adhesion_layer.as_ref(),
                )
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let iterator = batch.iter();

        #[cfg(feature = "parallel")]
        let iterator = batch.par_iter();

        let scores: Vec<f64> = iterator
            .map(|layers| scorer.score(layers, ScoringPhase::Search))
            .collect();

        for (layers, score) in batch.into_iter().zip(scores) {
            finalists.offer_with(score, || layers.clone());
            pool.offer(score, layers);
        }
        completed += batch_len;
    }

    if let Some(best) = pool.best() {
        info!(best_score = best.score, kept = pool.len(), "Random search finished.");
    }
    context.reporter.report(Progress::PhaseFinish);
    Ok(pool.into_sorted_vec())
}

fn refine_all(
    context: &OptimizationContext<DesignConfig>,
    scorer: &ObjectiveScorer,
    candidates: Vec<Candidate>,
    rng: &mut impl Rng,
    finalists: &mut BoundedBest<Vec<Layer>>,
) -> Result<(), EngineError> {
    let config = context.config;
    context.reporter.report(Progress::PhaseStart {
        name: REFINEMENT_PHASE,
    });

    let fixed_prefix = usize::from(config.adhesion_layer.is_some());
    let work: Vec<(Candidate, u64)> = candidates
        .into_iter()
        .map(|candidate| (candidate, rng.r#gen::<u64>()))
        .collect();
    let total = work.len().max(1);
    let span = REFINEMENT_END_PERCENT - SEARCH_END_PERCENT;

    let mut completed = 0;
    for chunk in work.chunks(REFINEMENT_BATCH) {
        context.checkpoint(
            REFINEMENT_PHASE,
            SEARCH_END_PERCENT + completed as f64 / total as f64 * span,
        )?;

        #[cfg(not(feature = "parallel"))]
        let iterator = chunk.iter();

        #[cfg(feature = "parallel")]
        let iterator = chunk.par_iter();

        let outcomes: Vec<(Candidate, BoundedBest<Vec<Layer>>)> = iterator
            .map(|(candidate, seed)| {
                let mut local_rng = StdRng::seed_from_u64(*seed);
                let mut local = BoundedBest::lowest(config.num_solutions);
                let refined = refine_candidate(
                    &mut local_rng,
                    candidate.clone(),
                    &config.refinement_stages,
                    fixed_prefix,
                    scorer,
                    &mut local,
                );
                (refined, local)
            })
            .collect();

        for ((before, _), (after, local)) in chunk.iter().zip(outcomes) {
            debug!(
                initial = before.score,
                refined = after.score,
                "Refined candidate."
            );
            finalists.merge(local);
        }
        completed += chunk.len();
    }

    context.reporter.report(Progress::PhaseFinish);
    Ok(())
}

fn finalize(
    context: &OptimizationContext<DesignConfig>,
    finalists: BoundedBest<Vec<Layer>>,
) -> Result<Vec<DesignSolution>, EngineError> {
    let config = context.config;
    context.reporter.report(Progress::PhaseStart {
        name: FINALIZE_PHASE,
    });
    context.checkpoint(FINALIZE_PHASE, REFINEMENT_END_PERCENT)?;

    let best_error = finalists.best().map_or(f64::INFINITY, |best| best.score);
    let accepted: Vec<Candidate> = finalists
        .into_sorted_vec()
        .into_iter()
        .filter(|candidate| candidate.score < config.acceptance_threshold)
        .collect();

    if accepted.is_empty() {
        warn!(
            best_error,
            threshold = config.acceptance_threshold,
            "No design reached the acceptance threshold."
        );
        return Err(EngineError::NoAcceptableSolution {
            best_error,
            threshold: config.acceptance_threshold,
        });
    }

    let solutions: Vec<DesignSolution> = accepted
        .into_iter()
        .map(|candidate| DesignSolution {
            curve: sweep(
                &candidate.item,
                &config.media,
                &config.tooling,
                &config.domain,
                0.0,
            ),
            error: candidate.score,
            layers: candidate.item,
        })
        .collect();

    context.checkpoint(FINALIZE_PHASE, 100.0)?;
    info!(
        solutions = solutions.len(),
        best_error, "Design optimization complete."
    );
    context.reporter.report(Progress::PhaseFinish);
    Ok(solutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialId;
    use crate::core::models::spectrum::{SpectrumSample, WavelengthRange};
    use crate::core::models::target::TargetWindow;
    use crate::core::optics::sweep::reflectivity_percent;
    use crate::engine::config::{DesignConfigBuilder, RefinementStage};
    use crate::engine::error::IndexClass;
    use std::sync::Mutex;

    fn quick_stages() -> Vec<RefinementStage> {
        vec![
            RefinementStage::new(60, 0.3),
            RefinementStage::new(60, 0.15),
            RefinementStage::new(30, 0.05),
        ]
    }

    fn point_target_builder() -> DesignConfigBuilder {
        DesignConfigBuilder::new()
            .targets(vec![TargetWindow::at_wavelength(550.0, 40.0, 50.0)])
            .materials(vec![MaterialId::SiO2, MaterialId::ZrO2])
            .layer_count(5)
            .domain(WavelengthRange::new(550.0, 550.0, 1.0))
            .iterations(1000)
            .top_candidates(10)
            .refinement_stages(quick_stages())
            .seed(42)
    }

    #[test]
    fn point_target_yields_in_band_solutions() {
        let config = point_target_builder().build().unwrap();
        let solutions = run(&config, &ProgressReporter::new(), &CancellationToken::new()).unwrap();

        assert!(!solutions.is_empty());
        assert!(solutions.len() <= 5);
        for pair in solutions.windows(2) {
            assert!(pair[0].error <= pair[1].error);
        }
        let best = &solutions[0];
        assert!(best.error < 3.0);
        assert_eq!(best.layers.len(), 5);
        let r = reflectivity_percent(&best.layers, &config.media, &config.tooling, 550.0);
        assert!((40.0..=50.0).contains(&r), "R(550) = {r}");
        assert_eq!(best.curve.len(), 1);
        assert!((best.curve[0].reflectivity - r).abs() < 1e-9);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = point_target_builder().iterations(400).build().unwrap();
        let first = run(&config, &ProgressReporter::new(), &CancellationToken::new()).unwrap();
        let second = run(&config, &ProgressReporter::new(), &CancellationToken::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn adhesion_layer_is_kept_at_substrate() {
        let adhesion = Layer::new(MaterialId::SiO2, 10.0);
        let config = point_target_builder()
            .adhesion_layer(adhesion)
            .build()
            .unwrap();
        let solutions = run(&config, &ProgressReporter::new(), &CancellationToken::new()).unwrap();
        for solution in &solutions {
            assert_eq!(solution.layers.len(), 6);
            assert_eq!(solution.layers[0], adhesion);
        }
    }

    #[test]
    fn missing_high_index_material_fails_fast() {
        let config = point_target_builder()
            .materials(vec![MaterialId::SiO2, MaterialId::MgF2])
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new(), &CancellationToken::new());
        assert!(matches!(
            result,
            Err(EngineError::EmptyMaterialPool {
                missing: IndexClass::High
            })
        ));
    }

    #[test]
    fn unreachable_target_reports_best_error() {
        // Two thin layers cannot reach 99% reflectance.
        let config = point_target_builder()
            .targets(vec![TargetWindow::at_wavelength(550.0, 99.0, 100.0)])
            .layer_count(2)
            .iterations(200)
            .build()
            .unwrap();
        match run(&config, &ProgressReporter::new(), &CancellationToken::new()) {
            Err(EngineError::NoAcceptableSolution {
                best_error,
                threshold,
            }) => {
                assert!(best_error >= 3.0);
                assert_eq!(threshold, 3.0);
            }
            other => panic!("expected NoAcceptableSolution, got {other:?}"),
        }
    }

    #[test]
    fn reverse_engineering_recovers_a_close_fit() {
        let truth = vec![
            Layer::new(MaterialId::ZrO2, 60.0),
            Layer::new(MaterialId::SiO2, 95.0),
        ];
        let domain = WavelengthRange::new(450.0, 650.0, 10.0);
        let reference: Vec<SpectrumSample> = domain
            .iter()
            .map(|wl| {
                let r = reflectivity_percent(
                    &truth,
                    &Default::default(),
                    &Default::default(),
                    wl,
                );
                SpectrumSample::new(wl, r)
            })
            .collect();
        let config = DesignConfigBuilder::new()
            .reference(reference)
            .materials(vec![MaterialId::SiO2, MaterialId::ZrO2])
            .layer_count(2)
            .domain(domain)
            .iterations(600)
            .top_candidates(5)
            .refinement_stages(quick_stages())
            .acceptance_threshold(10.0)
            .seed(8)
            .build()
            .unwrap();
        let solutions = run(&config, &ProgressReporter::new(), &CancellationToken::new()).unwrap();
        assert!(solutions[0].error < 10.0);
        assert_eq!(solutions[0].curve.len(), domain.len());
    }

    #[test]
    fn phases_report_in_order_with_monotonic_progress() {
        let config = point_target_builder().iterations(600).build().unwrap();
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        run(&config, &reporter, &CancellationToken::new()).unwrap();

        let events = events.lock().unwrap().clone();
        let phases: Vec<&str> = events
            .iter()
            .filter_map(|event| match event {
                Progress::PhaseStart { name } => Some(*name),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![SEARCH_PHASE, REFINEMENT_PHASE, FINALIZE_PHASE]);

        let percents: Vec<f64> = events
            .iter()
            .filter_map(|event| match event {
                Progress::Checkpoint { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect();
        assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(percents.last(), Some(&100.0));
    }

    #[test]
    fn cancellation_stops_the_search() {
        let config = point_target_builder().build().unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = run(&config, &ProgressReporter::new(), &token);
        assert!(matches!(
            result,
            Err(EngineError::Cancelled {
                phase: SEARCH_PHASE
            })
        ));
    }
}
