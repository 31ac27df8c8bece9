use super::scoring::{ObjectiveScorer, ScoringPhase};
use crate::core::models::layer::Layer;
use crate::engine::config::RefinementStage;
use crate::engine::state::{BoundedBest, Scored};
use crate::engine::utils::sampling::jitter_multiplier;
use rand::Rng;

pub const MIN_REFINED_THICKNESS_NM: f64 = 15.0;
pub const MAX_REFINED_THICKNESS_NM: f64 = 300.0;

/// Greedy multi-stage thickness jitter around one candidate.
///
/// Every evaluated variant is offered to `finalists`; a variant replaces the working
/// design only when it beats the current best. The first `fixed_prefix` layers (the
/// adhesion layer) are never jittered.
pub fn refine_candidate(
    rng: &mut impl Rng,
    candidate: Scored<Vec<Layer>>,
    stages: &[RefinementStage],
    fixed_prefix: usize,
    scorer: &ObjectiveScorer<'_>,
    finalists: &mut BoundedBest<Vec<Layer>>,
) -> Scored<Vec<Layer>> {
    let mut best = candidate;
    let mut trial = best.item.clone();

    for stage in stages {
        for _ in 0..stage.iterations {
            trial.clone_from(&best.item);
            for layer in trial.iter_mut().skip(fixed_prefix) {
                layer.thickness = (layer.thickness * jitter_multiplier(rng, stage.amplitude))
                    .clamp(MIN_REFINED_THICKNESS_NM, MAX_REFINED_THICKNESS_NM);
            }

            let score = scorer.score(&trial, ScoringPhase::Refinement);
            finalists.offer_with(score, || trial.clone());
            if score < best.score {
                best = Scored {
                    score,
                    item: trial.clone(),
                };
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialId;
    use crate::core::models::spectrum::WavelengthRange;
    use crate::core::models::target::TargetWindow;
    use crate::engine::config::{DesignConfig, DesignConfigBuilder};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config() -> DesignConfig {
        DesignConfigBuilder::new()
            .targets(vec![TargetWindow::at_wavelength(550.0, 0.0, 0.0)])
            .materials(vec![MaterialId::SiO2, MaterialId::ZrO2])
            .layer_count(2)
            .domain(WavelengthRange::new(550.0, 550.0, 1.0))
            .build()
            .unwrap()
    }

    fn start(scorer: &ObjectiveScorer<'_>) -> Scored<Vec<Layer>> {
        let layers = vec![
            Layer::new(MaterialId::SiO2, 10.0),
            Layer::new(MaterialId::ZrO2, 120.0),
            Layer::new(MaterialId::SiO2, 40.0),
        ];
        Scored {
            score: scorer.score(&layers, ScoringPhase::Refinement),
            item: layers,
        }
    }

    #[test]
    fn refinement_never_worsens_and_keeps_prefix() {
        let config = config();
        let scorer = ObjectiveScorer::new(&config);
        let initial = start(&scorer);
        let initial_score = initial.score;
        let mut finalists = BoundedBest::lowest(5);
        let mut rng = StdRng::seed_from_u64(5);

        let stages = [RefinementStage::new(200, 0.3), RefinementStage::new(100, 0.05)];
        let refined = refine_candidate(&mut rng, initial, &stages, 1, &scorer, &mut finalists);

        assert!(refined.score <= initial_score);
        assert_eq!(refined.item[0].thickness, 10.0);
        for layer in &refined.item[1..] {
            assert!(layer.thickness >= MIN_REFINED_THICKNESS_NM);
            assert!(layer.thickness <= MAX_REFINED_THICKNESS_NM);
        }
        assert_eq!(finalists.len(), 5);
        assert!(finalists.best().unwrap().score >= refined.score);
    }

    #[test]
    fn empty_schedule_returns_candidate_unchanged() {
        let config = config();
        let scorer = ObjectiveScorer::new(&config);
        let initial = start(&scorer);
        let mut finalists = BoundedBest::lowest(5);
        let mut rng = StdRng::seed_from_u64(1);
        let refined = refine_candidate(&mut rng, initial.clone(), &[], 0, &scorer, &mut finalists);
        assert_eq!(refined, initial);
        assert!(finalists.is_empty());
    }
}
