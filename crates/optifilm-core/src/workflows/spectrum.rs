use crate::core::analysis::compare::reference_rms;
use crate::core::color::{ColorResult, color_from_spectrum};
use crate::core::models::spectrum::{SpectralPoint, SpectrumSample, WavelengthRange};
use crate::core::models::stack::CoatingStack;
use crate::core::models::tooling::ToolingFactors;
use crate::core::optics::sweep;
use crate::core::stress::{StressResult, coating_stress};
use crate::engine::config::ConfigError;
use crate::engine::error::EngineError;
use serde::Serialize;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleSweep {
    pub angle: f64,
    pub points: Vec<SpectralPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumResult {
    pub sweeps: Vec<AngleSweep>,
    /// Perceived color of the normal-incidence reflection; `None` when the range misses
    /// the visible band.
    pub color: Option<ColorResult>,
    pub stress: StressResult,
    /// RMS distance from a measured spectrum at normal incidence, percentage points.
    pub reference_rms: Option<f64>,
}

/// Sweeps `stack` at every angle in `angles` (normal incidence when empty) and derives the
/// color and stress diagnostics.
#[instrument(skip_all, name = "spectrum_workflow")]
pub fn run(
    stack: &CoatingStack,
    tooling: &ToolingFactors,
    range: &WavelengthRange,
    angles: &[f64],
    reference: Option<&[SpectrumSample]>,
) -> Result<SpectrumResult, EngineError> {
    range.validate().map_err(ConfigError::from)?;
    let angles: Vec<f64> = if angles.is_empty() {
        vec![0.0]
    } else {
        angles.to_vec()
    };
    if let Some(&angle) = angles
        .iter()
        .find(|angle| !angle.is_finite() || !(0.0..90.0).contains(*angle))
    {
        return Err(ConfigError::InvalidParameter {
            name: "angles",
            reason: format!("angle must lie in [0, 90) degrees, got {angle}"),
        }
        .into());
    }
    info!(
        layers = stack.layers.len(),
        points = range.len(),
        angles = angles.len(),
        "Computing spectral response."
    );

    #[cfg(not(feature = "parallel"))]
    let iterator = angles.iter();

    #[cfg(feature = "parallel")]
    let iterator = angles.par_iter();

    let sweeps: Vec<AngleSweep> = iterator
        .map(|&angle| AngleSweep {
            angle,
            points: sweep(&stack.layers, &stack.media, tooling, range, angle),
        })
        .collect();

    let normal: Vec<SpectralPoint> = match sweeps.iter().find(|s| s.angle == 0.0) {
        Some(existing) => existing.points.clone(),
        None => sweep(&stack.layers, &stack.media, tooling, range, 0.0),
    };
    let samples: Vec<SpectrumSample> = normal.iter().copied().map(SpectrumSample::from).collect();
    let color = color_from_spectrum(&samples);
    if color.is_none() {
        debug!("Wavelength range has no visible samples; skipping color.");
    }

    Ok(SpectrumResult {
        sweeps,
        color,
        stress: coating_stress(&stack.layers),
        reference_rms: reference.and_then(|measured| reference_rms(&normal, measured, range.step)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialId;
    use crate::core::models::layer::Layer;
    use crate::core::models::stack::Media;
    use crate::core::stress::RiskLevel;

    fn stack() -> CoatingStack {
        CoatingStack::new(
            vec![
                Layer::new(MaterialId::SiO2, 148.42),
                Layer::new(MaterialId::ZrO2, 30.16),
                Layer::new(MaterialId::SiO2, 23.68),
                Layer::new(MaterialId::ZrO2, 61.29),
                Layer::new(MaterialId::SiO2, 88.03),
            ],
            Media::default(),
        )
    }

    #[test]
    fn default_angle_is_normal_incidence() {
        let result = run(
            &stack(),
            &ToolingFactors::new(),
            &WavelengthRange::visible(),
            &[],
            None,
        )
        .unwrap();
        assert_eq!(result.sweeps.len(), 1);
        assert_eq!(result.sweeps[0].angle, 0.0);
        assert!(result.color.is_some());
        assert_eq!(result.stress.risk_level, RiskLevel::Low);
        assert_eq!(result.reference_rms, None);
    }

    #[test]
    fn multiple_angles_keep_request_order() {
        let result = run(
            &stack(),
            &ToolingFactors::new(),
            &WavelengthRange::new(400.0, 700.0, 10.0),
            &[45.0, 0.0, 30.0],
            None,
        )
        .unwrap();
        let angles: Vec<f64> = result.sweeps.iter().map(|s| s.angle).collect();
        assert_eq!(angles, vec![45.0, 0.0, 30.0]);
        assert_ne!(result.sweeps[0].points, result.sweeps[1].points);
    }

    #[test]
    fn matching_reference_has_zero_rms() {
        let range = WavelengthRange::new(500.0, 600.0, 5.0);
        let baseline = run(&stack(), &ToolingFactors::new(), &range, &[0.0], None).unwrap();
        let measured: Vec<SpectrumSample> = baseline.sweeps[0]
            .points
            .iter()
            .copied()
            .map(SpectrumSample::from)
            .collect();
        let compared = run(&stack(), &ToolingFactors::new(), &range, &[0.0], Some(&measured)).unwrap();
        assert_eq!(compared.reference_rms, Some(0.0));
    }

    #[test]
    fn infrared_range_has_no_color() {
        let result = run(
            &stack(),
            &ToolingFactors::new(),
            &WavelengthRange::new(900.0, 1100.0, 10.0),
            &[0.0],
            None,
        )
        .unwrap();
        assert!(result.color.is_none());
    }

    #[test]
    fn grazing_angle_is_rejected() {
        let result = run(
            &stack(),
            &ToolingFactors::new(),
            &WavelengthRange::visible(),
            &[90.0],
            None,
        );
        assert!(matches!(
            result,
            Err(EngineError::Config {
                source: ConfigError::InvalidParameter { name: "angles", .. }
            })
        ));
    }
}
