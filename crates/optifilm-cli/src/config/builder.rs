use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileLayer, FileMedia, FileTarget, FileWavelengthRange};
use super::models::SpectrumJob;
use crate::cli::{DesignArgs, RangeOverrides, SpectrumArgs, YieldArgs};
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use optifilm::core::analysis::adjust::{AdjustError, apply_thickness_factor, apply_wavelength_shift};
use optifilm::core::models::layer::{IonAssist, Layer};
use optifilm::core::models::spectrum::{SpectrumSample, WavelengthRange};
use optifilm::core::models::stack::{CoatingStack, Media};
use optifilm::core::models::target::TargetWindow;
use optifilm::engine::config::{DesignConfig, DesignConfigBuilder, YieldConfig, YieldConfigBuilder};
use tracing::debug;

pub fn build_spectrum_job(file: FileConfig, args: &SpectrumArgs) -> Result<SpectrumJob> {
    let defaults = DefaultsConfig::default();
    let file = apply_set_values(file, &args.set_values)?;

    let range = resolve_range(file.wavelength, args.range, &defaults);
    range
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut layers = resolve_layers(&file.layers)?;
    if let Some(factor) = args.scale {
        debug!(factor, selection = ?args.scale_layers, "Scaling layer thicknesses.");
        layers = apply_thickness_factor(&layers, factor, args.scale_layers).map_err(adjust_error)?;
    }
    if let Some(shift) = args.shift {
        debug!(shift, "Shifting spectral features.");
        layers = apply_wavelength_shift(&layers, &range, shift).map_err(adjust_error)?;
    }
    if let Some(shift) = args.vertical_shift.filter(|shift| !shift.is_finite()) {
        return Err(CliError::Argument(format!(
            "vertical shift must be a finite number, got {shift}"
        )));
    }

    Ok(SpectrumJob {
        stack: CoatingStack::new(layers, resolve_media(file.media)),
        tooling: file.tooling.unwrap_or_default(),
        range,
        angles: args.angles.clone(),
        vertical_shift: args.vertical_shift,
    })
}

pub fn build_yield_config(file: FileConfig, args: &YieldArgs) -> Result<YieldConfig> {
    let defaults = DefaultsConfig::default();
    let file = apply_set_values(file, &args.set_values)?;
    let monte_carlo = file.monte_carlo.clone().unwrap_or_default();

    let mut builder = YieldConfigBuilder::new()
        .layers(resolve_layers(&file.layers)?)
        .media(resolve_media(file.media))
        .tooling(file.tooling.clone().unwrap_or_default())
        .targets(resolve_targets(&file.targets))
        .num_runs(args.runs.or(monte_carlo.runs).unwrap_or(defaults.num_runs))
        .thickness_error_percent(
            monte_carlo
                .thickness_error
                .unwrap_or(defaults.thickness_error_percent),
        )
        .ri_error_percent(monte_carlo.ri_error.unwrap_or(defaults.ri_error_percent))
        .tooling_error_percent(
            monte_carlo
                .tooling_error
                .unwrap_or(defaults.tooling_error_percent),
        );
    if let Some(seed) = args.seed.or(monte_carlo.seed) {
        builder = builder.seed(seed);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

pub fn build_design_config(
    file: FileConfig,
    args: &DesignArgs,
    reference: Option<Vec<SpectrumSample>>,
) -> Result<DesignConfig> {
    let defaults = DefaultsConfig::default();
    let file = apply_set_values(file, &args.set_values)?;
    let design = file.design.clone().unwrap_or_default();

    let mut builder = DesignConfigBuilder::new()
        .materials(design.materials.unwrap_or(defaults.design_materials.clone()))
        .layer_count(args.layers.or(design.layers).unwrap_or(defaults.design_layers))
        .domain(resolve_range(file.wavelength, args.range, &defaults))
        .media(resolve_media(file.media))
        .tooling(file.tooling.clone().unwrap_or_default());

    builder = match reference {
        Some(samples) => {
            debug!(samples = samples.len(), "Designing against a measured spectrum.");
            builder.reference(samples)
        }
        None => builder.targets(resolve_targets(&file.targets)),
    };

    if let Some(iterations) = args.iterations.or(design.iterations) {
        builder = builder.iterations(iterations);
    }
    if let Some(top) = design.top_candidates {
        builder = builder.top_candidates(top);
    }
    if let Some(weight) = design.smoothness_weight {
        builder = builder.smoothness_weight(weight);
    }
    if let Some(adhesion) = design.adhesion {
        builder = builder.adhesion_layer(Layer::new(adhesion.material, adhesion.thickness));
    }
    if let Some(threshold) = design.acceptance_threshold {
        builder = builder.acceptance_threshold(threshold);
    }
    if let Some(n) = args.num_solutions.or(design.num_solutions) {
        builder = builder.num_solutions(n);
    }
    if let Some(seed) = args.seed.or(design.seed) {
        builder = builder.seed(seed);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn resolve_layers(layers: &[FileLayer]) -> Result<Vec<Layer>> {
    layers
        .iter()
        .enumerate()
        .map(|(index, file)| {
            if !file.thickness.is_finite() || file.thickness < 0.0 {
                return Err(CliError::Config(format!(
                    "Layer {} ({}) has invalid thickness {}",
                    index + 1,
                    file.material,
                    file.thickness
                )));
            }
            let layer = Layer::new(file.material, file.thickness);
            Ok(match file.ion_assist {
                Some(settings) => layer.with_ion_assist(IonAssist {
                    enabled: settings.enabled.unwrap_or(true),
                    ri_increase_percent: settings.ri_increase.unwrap_or(
                        file.material
                            .material()
                            .default_ion_assist_increase_percent,
                    ),
                }),
                None => layer,
            })
        })
        .collect()
}

fn resolve_media(file: Option<FileMedia>) -> Media {
    let defaults = Media::default();
    let file = file.unwrap_or_default();
    Media::new(
        file.incident.unwrap_or(defaults.incident),
        file.substrate.unwrap_or(defaults.substrate),
    )
}

fn resolve_targets(targets: &[FileTarget]) -> Vec<TargetWindow> {
    targets
        .iter()
        .map(|t| {
            TargetWindow::new(
                t.wavelength_min,
                t.wavelength_max.unwrap_or(t.wavelength_min),
                t.reflectivity_min,
                t.reflectivity_max,
            )
        })
        .collect()
}

fn resolve_range(
    file: Option<FileWavelengthRange>,
    overrides: RangeOverrides,
    defaults: &DefaultsConfig,
) -> WavelengthRange {
    let file = file.unwrap_or_default();
    let fallback = defaults.wavelength_range;
    WavelengthRange::new(
        overrides.min.or(file.min).unwrap_or(fallback.min),
        overrides.max.or(file.max).unwrap_or(fallback.max),
        overrides.step.or(file.step).unwrap_or(fallback.step),
    )
}

fn adjust_error(error: AdjustError) -> CliError {
    CliError::Argument(error.to_string())
}

fn argument_error(error: ParseError) -> CliError {
    CliError::Argument(error.to_string())
}

fn apply_set_values(mut file: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for assignment in set_values {
        let (key, value) = parser::parse_assignment(assignment).map_err(argument_error)?;
        let float = || parser::parse_value::<f64>(key, value, "float").map_err(argument_error);
        let count = || parser::parse_value::<usize>(key, value, "integer").map_err(argument_error);
        let seed = || parser::parse_value::<u64>(key, value, "integer").map_err(argument_error);

        match key {
            "media.incident" => {
                file.media.get_or_insert_with(Default::default).incident = Some(float()?);
            }
            "media.substrate" => {
                file.media.get_or_insert_with(Default::default).substrate = Some(float()?);
            }
            "wavelength.min" => {
                file.wavelength.get_or_insert_with(Default::default).min = Some(float()?);
            }
            "wavelength.max" => {
                file.wavelength.get_or_insert_with(Default::default).max = Some(float()?);
            }
            "wavelength.step" => {
                file.wavelength.get_or_insert_with(Default::default).step = Some(float()?);
            }
            "monte-carlo.runs" => {
                file.monte_carlo.get_or_insert_with(Default::default).runs = Some(count()?);
            }
            "monte-carlo.thickness-error" => {
                file.monte_carlo
                    .get_or_insert_with(Default::default)
                    .thickness_error = Some(float()?);
            }
            "monte-carlo.ri-error" => {
                file.monte_carlo.get_or_insert_with(Default::default).ri_error = Some(float()?);
            }
            "monte-carlo.tooling-error" => {
                file.monte_carlo
                    .get_or_insert_with(Default::default)
                    .tooling_error = Some(float()?);
            }
            "monte-carlo.seed" => {
                file.monte_carlo.get_or_insert_with(Default::default).seed = Some(seed()?);
            }
            "design.layers" => {
                file.design.get_or_insert_with(Default::default).layers = Some(count()?);
            }
            "design.iterations" => {
                file.design.get_or_insert_with(Default::default).iterations = Some(count()?);
            }
            "design.top-candidates" => {
                file.design.get_or_insert_with(Default::default).top_candidates = Some(count()?);
            }
            "design.num-solutions" => {
                file.design.get_or_insert_with(Default::default).num_solutions = Some(count()?);
            }
            "design.smoothness-weight" => {
                file.design
                    .get_or_insert_with(Default::default)
                    .smoothness_weight = Some(float()?);
            }
            "design.acceptance-threshold" => {
                file.design
                    .get_or_insert_with(Default::default)
                    .acceptance_threshold = Some(float()?);
            }
            "design.seed" => {
                file.design.get_or_insert_with(Default::default).seed = Some(seed()?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(file)
}
