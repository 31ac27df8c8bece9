use crate::core::materials::MaterialId;
use crate::core::models::layer::Layer;
use crate::core::models::spectrum::{RangeError, SpectrumSample, WavelengthRange};
use crate::core::models::stack::Media;
use crate::core::models::target::{TargetError, TargetWindow, validate_targets};
use crate::core::models::tooling::ToolingFactors;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Invalid target window: {0}")]
    InvalidTarget(#[from] TargetError),
    #[error("Invalid wavelength range: {0}")]
    InvalidRange(#[from] RangeError),
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

fn require_non_negative_percent(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid(name, format!("must be a finite, non-negative percentage (got {value})")))
    }
}

/// Relative manufacturing errors, in percent, applied through the Irwin-Hall sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbationConfig {
    pub thickness_error_percent: f64,
    pub ri_error_percent: f64,
    pub tooling_error_percent: f64,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            thickness_error_percent: 2.0,
            ri_error_percent: 1.0,
            tooling_error_percent: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldConfig {
    pub layers: Vec<Layer>,
    pub media: Media,
    pub tooling: ToolingFactors,
    pub targets: Vec<TargetWindow>,
    pub num_runs: usize,
    pub perturbation: PerturbationConfig,
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct YieldConfigBuilder {
    layers: Option<Vec<Layer>>,
    media: Option<Media>,
    tooling: Option<ToolingFactors>,
    targets: Vec<TargetWindow>,
    num_runs: Option<usize>,
    thickness_error_percent: Option<f64>,
    ri_error_percent: Option<f64>,
    tooling_error_percent: Option<f64>,
    seed: Option<u64>,
}

impl YieldConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = Some(layers);
        self
    }
    pub fn media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }
    pub fn tooling(mut self, tooling: ToolingFactors) -> Self {
        self.tooling = Some(tooling);
        self
    }
    pub fn targets(mut self, targets: Vec<TargetWindow>) -> Self {
        self.targets = targets;
        self
    }
    pub fn add_target(mut self, target: TargetWindow) -> Self {
        self.targets.push(target);
        self
    }
    pub fn num_runs(mut self, runs: usize) -> Self {
        self.num_runs = Some(runs);
        self
    }
    pub fn thickness_error_percent(mut self, percent: f64) -> Self {
        self.thickness_error_percent = Some(percent);
        self
    }
    pub fn ri_error_percent(mut self, percent: f64) -> Self {
        self.ri_error_percent = Some(percent);
        self
    }
    pub fn tooling_error_percent(mut self, percent: f64) -> Self {
        self.tooling_error_percent = Some(percent);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<YieldConfig, ConfigError> {
        let layers = self.layers.ok_or(ConfigError::MissingParameter("layers"))?;
        if self.targets.is_empty() {
            return Err(ConfigError::MissingParameter("targets"));
        }
        validate_targets(&self.targets)?;

        let num_runs = self
            .num_runs
            .ok_or(ConfigError::MissingParameter("num_runs"))?;
        if num_runs == 0 {
            return Err(invalid("num_runs", "must be greater than zero"));
        }

        let defaults = PerturbationConfig::default();
        let perturbation = PerturbationConfig {
            thickness_error_percent: require_non_negative_percent(
                "thickness_error_percent",
                self.thickness_error_percent
                    .unwrap_or(defaults.thickness_error_percent),
            )?,
            ri_error_percent: require_non_negative_percent(
                "ri_error_percent",
                self.ri_error_percent.unwrap_or(defaults.ri_error_percent),
            )?,
            tooling_error_percent: require_non_negative_percent(
                "tooling_error_percent",
                self.tooling_error_percent
                    .unwrap_or(defaults.tooling_error_percent),
            )?,
        };

        Ok(YieldConfig {
            layers,
            media: self.media.unwrap_or_default(),
            tooling: self.tooling.unwrap_or_default(),
            targets: self.targets,
            num_runs,
            perturbation,
            seed: self.seed,
        })
    }
}

/// What a design is fitted against.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignObjective {
    /// Forward design against target windows.
    Targets(Vec<TargetWindow>),
    /// Reverse engineering from a measured spectrum; every sample contributes.
    Reference(Vec<SpectrumSample>),
}

impl DesignObjective {
    pub fn is_reverse_engineering(&self) -> bool {
        matches!(self, DesignObjective::Reference(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementStage {
    pub iterations: usize,
    /// Relative jitter amplitude; 0.3 means each thickness is scaled by U(0.7, 1.3).
    pub amplitude: f64,
}

impl RefinementStage {
    pub const fn new(iterations: usize, amplitude: f64) -> Self {
        Self {
            iterations,
            amplitude,
        }
    }
}

pub const DEFAULT_REFINEMENT_STAGES: [RefinementStage; 3] = [
    RefinementStage::new(1000, 0.30),
    RefinementStage::new(1000, 0.15),
    RefinementStage::new(500, 0.05),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub iterations: usize,
    /// Uniform draw range for initial layer thicknesses, nm.
    pub thickness_min: f64,
    pub thickness_max: f64,
    pub top_candidates: usize,
}

impl SearchConfig {
    pub fn for_objective(objective: &DesignObjective) -> Self {
        if objective.is_reverse_engineering() {
            Self {
                iterations: 100_000,
                thickness_min: 30.0,
                thickness_max: 180.0,
                top_candidates: 50,
            }
        } else {
            Self {
                iterations: 75_000,
                thickness_min: 25.0,
                thickness_max: 150.0,
                top_candidates: 50,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    pub objective: DesignObjective,
    pub materials: Vec<MaterialId>,
    pub layer_count: usize,
    pub domain: WavelengthRange,
    pub media: Media,
    pub tooling: ToolingFactors,
    pub search: SearchConfig,
    pub refinement_stages: Vec<RefinementStage>,
    /// User smoothness weight for target mode; `None` uses the built-in weights.
    pub smoothness_weight: Option<f64>,
    /// Fixed layer placed on the substrate below every candidate.
    pub adhesion_layer: Option<Layer>,
    pub acceptance_threshold: f64,
    pub num_solutions: usize,
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct DesignConfigBuilder {
    objective: Option<DesignObjective>,
    materials: Vec<MaterialId>,
    layer_count: Option<usize>,
    domain: Option<WavelengthRange>,
    media: Option<Media>,
    tooling: Option<ToolingFactors>,
    iterations: Option<usize>,
    top_candidates: Option<usize>,
    refinement_stages: Option<Vec<RefinementStage>>,
    smoothness_weight: Option<f64>,
    adhesion_layer: Option<Layer>,
    acceptance_threshold: Option<f64>,
    num_solutions: Option<usize>,
    seed: Option<u64>,
}

impl DesignConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objective(mut self, objective: DesignObjective) -> Self {
        self.objective = Some(objective);
        self
    }
    pub fn targets(self, targets: Vec<TargetWindow>) -> Self {
        self.objective(DesignObjective::Targets(targets))
    }
    pub fn reference(self, samples: Vec<SpectrumSample>) -> Self {
        self.objective(DesignObjective::Reference(samples))
    }
    pub fn materials(mut self, materials: Vec<MaterialId>) -> Self {
        self.materials = materials;
        self
    }
    pub fn layer_count(mut self, count: usize) -> Self {
        self.layer_count = Some(count);
        self
    }
    pub fn domain(mut self, domain: WavelengthRange) -> Self {
        self.domain = Some(domain);
        self
    }
    pub fn media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }
    pub fn tooling(mut self, tooling: ToolingFactors) -> Self {
        self.tooling = Some(tooling);
        self
    }
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }
    pub fn top_candidates(mut self, count: usize) -> Self {
        self.top_candidates = Some(count);
        self
    }
    pub fn refinement_stages(mut self, stages: Vec<RefinementStage>) -> Self {
        self.refinement_stages = Some(stages);
        self
    }
    pub fn smoothness_weight(mut self, weight: f64) -> Self {
        self.smoothness_weight = Some(weight);
        self
    }
    pub fn adhesion_layer(mut self, layer: Layer) -> Self {
        self.adhesion_layer = Some(layer);
        self
    }
    pub fn acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = Some(threshold);
        self
    }
    pub fn num_solutions(mut self, n: usize) -> Self {
        self.num_solutions = Some(n);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DesignConfig, ConfigError> {
        let objective = self
            .objective
            .ok_or(ConfigError::MissingParameter("objective"))?;
        match &objective {
            DesignObjective::Targets(targets) if targets.is_empty() => {
                return Err(ConfigError::MissingParameter("targets"));
            }
            DesignObjective::Targets(targets) => validate_targets(targets)?,
            DesignObjective::Reference(samples) if samples.is_empty() => {
                return Err(ConfigError::MissingParameter("reference"));
            }
            DesignObjective::Reference(_) => {}
        }

        if self.materials.is_empty() {
            return Err(ConfigError::MissingParameter("materials"));
        }
        let layer_count = self
            .layer_count
            .ok_or(ConfigError::MissingParameter("layer_count"))?;
        if layer_count == 0 {
            return Err(invalid("layer_count", "must be at least one"));
        }

        let domain = self.domain.ok_or(ConfigError::MissingParameter("domain"))?;
        domain.validate()?;

        let mut search = SearchConfig::for_objective(&objective);
        if let Some(iterations) = self.iterations {
            search.iterations = iterations;
        }
        if let Some(top) = self.top_candidates {
            search.top_candidates = top;
        }
        if search.iterations == 0 {
            return Err(invalid("iterations", "must be greater than zero"));
        }
        if search.top_candidates == 0 {
            return Err(invalid("top_candidates", "must be greater than zero"));
        }

        let refinement_stages = self
            .refinement_stages
            .unwrap_or_else(|| DEFAULT_REFINEMENT_STAGES.to_vec());
        if let Some(stage) = refinement_stages
            .iter()
            .find(|s| !s.amplitude.is_finite() || !(0.0..1.0).contains(&s.amplitude))
        {
            return Err(invalid(
                "refinement_stages",
                format!("amplitude must lie in [0, 1), got {}", stage.amplitude),
            ));
        }

        if let Some(weight) = self.smoothness_weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid("smoothness_weight", "must be finite and non-negative"));
            }
        }
        if let Some(adhesion) = &self.adhesion_layer {
            if !adhesion.thickness.is_finite() || adhesion.thickness < 0.0 {
                return Err(invalid("adhesion_layer", "thickness must be non-negative"));
            }
        }

        let acceptance_threshold = self.acceptance_threshold.unwrap_or(3.0);
        if !acceptance_threshold.is_finite() || acceptance_threshold <= 0.0 {
            return Err(invalid("acceptance_threshold", "must be positive"));
        }
        let num_solutions = self.num_solutions.unwrap_or(5);
        if num_solutions == 0 {
            return Err(invalid("num_solutions", "must be greater than zero"));
        }

        Ok(DesignConfig {
            objective,
            materials: self.materials,
            layer_count,
            domain,
            media: self.media.unwrap_or_default(),
            tooling: self.tooling.unwrap_or_default(),
            search,
            refinement_stages,
            smoothness_weight: self.smoothness_weight,
            adhesion_layer: self.adhesion_layer,
            acceptance_threshold,
            num_solutions,
            seed: self.seed,
        })
    }
}
