use crate::core::models::layer::Layer;
use crate::core::models::stack::Media;
use crate::core::models::target::TargetWindow;
use crate::core::models::tooling::ToolingFactors;
use crate::core::optics::sweep::reflectivity_percent;
use crate::engine::config::PerturbationConfig;
use crate::engine::utils::sampling::perturbation_multiplier;
use rand::Rng;
use serde::Serialize;

/// One simulated deposition: the stack and machine calibration as actually realized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualRun {
    pub layers: Vec<Layer>,
    pub tooling: ToolingFactors,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    pub passed: bool,
    /// Largest out-of-band distance in percentage points; 0 for a passing run.
    pub error: f64,
}

/// Draws one perturbed copy of the nominal design.
///
/// Draw order is fixed: for each layer its thickness, then its ion-assist index increase
/// (enabled layers only); then one tooling draw per material in the tooling map.
pub fn perturb(
    rng: &mut impl Rng,
    layers: &[Layer],
    tooling: &ToolingFactors,
    perturbation: &PerturbationConfig,
) -> VirtualRun {
    let layers = layers
        .iter()
        .map(|layer| {
            let mut realized = *layer;
            realized.thickness *= perturbation_multiplier(rng, perturbation.thickness_error_percent);
            if let Some(settings) = realized.ion_assist.as_mut().filter(|s| s.enabled) {
                settings.ri_increase_percent *=
                    perturbation_multiplier(rng, perturbation.ri_error_percent);
            }
            realized
        })
        .collect();

    let tooling = tooling
        .iter()
        .map(|(material, factor)| {
            (
                material,
                factor * perturbation_multiplier(rng, perturbation.tooling_error_percent),
            )
        })
        .collect();

    VirtualRun { layers, tooling }
}

pub fn evaluate(run: &VirtualRun, targets: &[TargetWindow], media: &Media) -> RunOutcome {
    let mut passed = true;
    let mut error: f64 = 0.0;
    for target in targets {
        for wavelength in target.sample_wavelengths() {
            let r = reflectivity_percent(&run.layers, media, &run.tooling, wavelength);
            if !target.contains(r) {
                passed = false;
                error = error.max(target.excursion(r));
            }
        }
    }
    RunOutcome { passed, error }
}
