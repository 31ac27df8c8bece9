use crate::core::models::layer::{Layer, total_optical_thickness};
use crate::core::models::target::TargetWindow;
use crate::core::models::spectrum::SpectrumSample;
use crate::core::optics::sweep::reflectivity_percent;
use crate::engine::config::{DesignConfig, DesignObjective};
use itertools::Itertools;

/// Slopes smaller than this (percentage points per grid step) never count as a peak.
const PEAK_SLOPE_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPhase {
    Search,
    Refinement,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyWeights {
    pub smoothness: f64,
    pub peak: f64,
    pub thickness_divisor: f64,
}

impl PenaltyWeights {
    pub fn for_phase(phase: ScoringPhase, reverse_engineering: bool, user_weight: Option<f64>) -> Self {
        match (phase, reverse_engineering) {
            (ScoringPhase::Search, true) => Self {
                smoothness: 0.2,
                peak: 1.5,
                thickness_divisor: 5000.0,
            },
            (ScoringPhase::Search, false) => Self {
                smoothness: user_weight.unwrap_or(0.3),
                peak: 2.0,
                thickness_divisor: 3000.0,
            },
            (ScoringPhase::Refinement, true) => Self {
                smoothness: 0.15,
                peak: 1.0,
                thickness_divisor: 5000.0,
            },
            (ScoringPhase::Refinement, false) => Self {
                smoothness: user_weight.unwrap_or(0.25),
                peak: 1.5,
                thickness_divisor: 3000.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothness {
    /// RMS of point-to-point reflectivity changes, percentage points.
    pub rms_variation: f64,
    pub peak_count: usize,
}

/// Scores candidate stacks against a design objective.
///
/// The score is the RMS fit error plus smoothness, peak, and optical-thickness penalties
/// evaluated on a grid twice as coarse as the design domain.
pub struct ObjectiveScorer<'a> {
    config: &'a DesignConfig,
    smoothness_grid: Vec<f64>,
}

fn slope_sign(slope: f64) -> i8 {
    if slope > 0.0 {
        1
    } else if slope < 0.0 {
        -1
    } else {
        0
    }
}

impl<'a> ObjectiveScorer<'a> {
    pub fn new(config: &'a DesignConfig) -> Self {
        Self {
            config,
            smoothness_grid: config.domain.coarsened(2.0).wavelengths(),
        }
    }

    pub fn weights(&self, phase: ScoringPhase) -> PenaltyWeights {
        PenaltyWeights::for_phase(
            phase,
            self.config.objective.is_reverse_engineering(),
            self.config.smoothness_weight,
        )
    }

    #[inline]
    fn reflectivity(&self, layers: &[Layer], wavelength: f64) -> f64 {
        reflectivity_percent(layers, &self.config.media, &self.config.tooling, wavelength)
    }

    /// RMS deviation from the objective in percentage points.
    pub fn fit_error(&self, layers: &[Layer]) -> f64 {
        let (sum_squared, count) = match &self.config.objective {
            DesignObjective::Targets(targets) => self.target_residuals(layers, targets),
            DesignObjective::Reference(samples) => self.reference_residuals(layers, samples),
        };
        if count > 0 {
            (sum_squared / count as f64).sqrt()
        } else {
            0.0
        }
    }

    fn reference_residuals(&self, layers: &[Layer], samples: &[SpectrumSample]) -> (f64, usize) {
        let sum = samples
            .iter()
            .map(|s| (self.reflectivity(layers, s.wavelength) - s.reflectivity).powi(2))
            .sum();
        (sum, samples.len())
    }

    fn target_residuals(&self, layers: &[Layer], targets: &[TargetWindow]) -> (f64, usize) {
        let mut sum = 0.0;
        let mut count = 0;
        for target in targets {
            if target.is_single_wavelength() {
                let r = self.reflectivity(layers, target.midpoint_wavelength());
                sum += if target.is_reflectivity_range() {
                    target.excursion(r).powi(2)
                } else {
                    (r - target.midpoint_reflectivity()).powi(2)
                };
                count += 1;
                continue;
            }
            for wavelength in target.sample_wavelengths() {
                let r = self.reflectivity(layers, wavelength);
                if target.is_reflectivity_range() {
                    let excursion = target.excursion(r);
                    if excursion > 0.0 {
                        sum += excursion.powi(2);
                        count += 1;
                    }
                } else {
                    sum += (r - target.midpoint_reflectivity()).powi(2);
                    count += 1;
                }
            }
        }
        (sum, count)
    }

    /// `None` when the grid has fewer than two points.
    pub fn smoothness(&self, layers: &[Layer]) -> Option<Smoothness> {
        let curve: Vec<f64> = self
            .smoothness_grid
            .iter()
            .map(|&wavelength| self.reflectivity(layers, wavelength))
            .collect();
        if curve.len() < 2 {
            return None;
        }

        let slopes: Vec<f64> = curve.iter().tuple_windows().map(|(a, b)| b - a).collect();
        let sum_squared: f64 = slopes.iter().map(|s| s * s).sum();
        let peak_count = slopes
            .iter()
            .tuple_windows()
            .filter(|&(prev, cur)| {
                slope_sign(*cur) != slope_sign(*prev) && cur.abs() > PEAK_SLOPE_THRESHOLD
            })
            .count();

        Some(Smoothness {
            rms_variation: (sum_squared / slopes.len() as f64).sqrt(),
            peak_count,
        })
    }

    pub fn score(&self, layers: &[Layer], phase: ScoringPhase) -> f64 {
        let fit = self.fit_error(layers);
        match self.smoothness(layers) {
            Some(smoothness) => {
                let weights = self.weights(phase);
                fit + smoothness.rms_variation * weights.smoothness
                    + smoothness.peak_count as f64 * weights.peak
                    + total_optical_thickness(layers) / weights.thickness_divisor
            }
            None => fit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialId;
    use crate::core::models::spectrum::WavelengthRange;
    use crate::core::models::stack::Media;
    use crate::core::models::tooling::ToolingFactors;
    use crate::core::optics::reflectance;
    use crate::engine::config::DesignConfigBuilder;

    const TOLERANCE: f64 = 1e-9;

    fn config(objective: DesignObjective, domain: WavelengthRange) -> DesignConfig {
        DesignConfigBuilder::new()
            .objective(objective)
            .materials(vec![MaterialId::SiO2, MaterialId::ZrO2])
            .layer_count(2)
            .domain(domain)
            .build()
            .unwrap()
    }

    fn stack() -> Vec<Layer> {
        vec![
            Layer::new(MaterialId::ZrO2, 60.0),
            Layer::new(MaterialId::SiO2, 90.0),
        ]
    }

    fn r_at(layers: &[Layer], wavelength: f64) -> f64 {
        reflectance(layers, &Media::default(), &ToolingFactors::new(), wavelength, 0.0) * 100.0
    }

    #[test]
    fn point_target_error_is_distance_to_midpoint() {
        let layers = stack();
        let r = r_at(&layers, 550.0);
        let target = TargetWindow::at_wavelength(550.0, r + 1.0, r + 3.0);
        let cfg = config(
            DesignObjective::Targets(vec![target]),
            WavelengthRange::new(550.0, 550.0, 1.0),
        );
        let scorer = ObjectiveScorer::new(&cfg);
        // Range mode: only the excursion below the band counts.
        assert!((scorer.fit_error(&layers) - 1.0).abs() < TOLERANCE);

        let exact = TargetWindow::at_wavelength(550.0, r + 2.0, r + 2.0);
        let cfg = config(
            DesignObjective::Targets(vec![exact]),
            WavelengthRange::new(550.0, 550.0, 1.0),
        );
        assert!((ObjectiveScorer::new(&cfg).fit_error(&layers) - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn satisfied_range_target_has_zero_error() {
        let target = TargetWindow::new(450.0, 650.0, 0.0, 100.0);
        let cfg = config(
            DesignObjective::Targets(vec![target]),
            WavelengthRange::new(450.0, 650.0, 5.0),
        );
        assert_eq!(ObjectiveScorer::new(&cfg).fit_error(&stack()), 0.0);
    }

    #[test]
    fn reference_error_is_rms_over_every_sample() {
        let layers = stack();
        let samples = vec![
            SpectrumSample::new(500.0, r_at(&layers, 500.0) + 3.0),
            SpectrumSample::new(600.0, r_at(&layers, 600.0) - 4.0),
        ];
        let cfg = config(
            DesignObjective::Reference(samples),
            WavelengthRange::new(500.0, 600.0, 1.0),
        );
        let expected = ((9.0 + 16.0) / 2.0_f64).sqrt();
        assert!((ObjectiveScorer::new(&cfg).fit_error(&layers) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn single_point_domain_adds_no_penalties() {
        let layers = stack();
        let target = TargetWindow::at_wavelength(550.0, 0.0, 0.0);
        let cfg = config(
            DesignObjective::Targets(vec![target]),
            WavelengthRange::new(550.0, 550.0, 1.0),
        );
        let scorer = ObjectiveScorer::new(&cfg);
        assert!(scorer.smoothness(&layers).is_none());
        assert_eq!(scorer.score(&layers, ScoringPhase::Search), scorer.fit_error(&layers));
    }

    #[test]
    fn penalties_include_thickness_regularizer() {
        let target = TargetWindow::new(400.0, 800.0, 0.0, 100.0);
        let cfg = config(
            DesignObjective::Targets(vec![target]),
            WavelengthRange::new(400.0, 800.0, 5.0),
        );
        let scorer = ObjectiveScorer::new(&cfg);
        let layers = stack();
        let smoothness = scorer.smoothness(&layers).unwrap();
        let weights = scorer.weights(ScoringPhase::Refinement);
        let expected = smoothness.rms_variation * 0.25
            + smoothness.peak_count as f64 * 1.5
            + total_optical_thickness(&layers) / 3000.0;
        assert!((scorer.score(&layers, ScoringPhase::Refinement) - expected).abs() < TOLERANCE);
        assert_eq!(weights.peak, 1.5);
    }

    #[test]
    fn thick_stacks_show_more_peaks_than_bare_substrate() {
        let target = TargetWindow::new(400.0, 800.0, 0.0, 100.0);
        let cfg = config(
            DesignObjective::Targets(vec![target]),
            WavelengthRange::new(400.0, 800.0, 2.0),
        );
        let scorer = ObjectiveScorer::new(&cfg);
        let flat = scorer.smoothness(&[]).unwrap();
        assert_eq!(flat.peak_count, 0);
        assert!(flat.rms_variation < 1e-9);

        let thick = [
            Layer::new(MaterialId::TiO2, 1500.0),
            Layer::new(MaterialId::SiO2, 1500.0),
        ];
        assert!(scorer.smoothness(&thick).unwrap().peak_count > 0);
    }

    #[test]
    fn weights_depend_on_mode_and_user_setting() {
        let reverse = PenaltyWeights::for_phase(ScoringPhase::Search, true, Some(9.0));
        assert_eq!(reverse.smoothness, 0.2);
        let forward = PenaltyWeights::for_phase(ScoringPhase::Search, false, Some(0.8));
        assert_eq!(forward.smoothness, 0.8);
        assert_eq!(forward.thickness_divisor, 3000.0);
        let default = PenaltyWeights::for_phase(ScoringPhase::Refinement, false, None);
        assert_eq!(default.smoothness, 0.25);
    }
}
