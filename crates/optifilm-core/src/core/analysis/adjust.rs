use crate::core::models::layer::Layer;
use crate::core::models::spectrum::{SpectralPoint, WavelengthRange};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdjustError {
    #[error("Thickness factor must be a positive number, got {0}")]
    InvalidFactor(f64),
    #[error("Wavelength shift must be a non-zero finite number, got {0}")]
    InvalidShift(f64),
    #[error("Unknown layer selection '{0}' (expected all, odd or even)")]
    UnknownSelection(String),
}

/// Which layers a thickness factor applies to. Odd/even use 1-based layer numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerSelection {
    #[default]
    All,
    Odd,
    Even,
}

impl LayerSelection {
    pub fn includes(self, index: usize) -> bool {
        let layer_number = index + 1;
        match self {
            LayerSelection::All => true,
            LayerSelection::Odd => layer_number % 2 == 1,
            LayerSelection::Even => layer_number % 2 == 0,
        }
    }
}

impl FromStr for LayerSelection {
    type Err = AdjustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(LayerSelection::All),
            "odd" => Ok(LayerSelection::Odd),
            "even" => Ok(LayerSelection::Even),
            other => Err(AdjustError::UnknownSelection(other.to_string())),
        }
    }
}

pub fn apply_thickness_factor(
    layers: &[Layer],
    factor: f64,
    selection: LayerSelection,
) -> Result<Vec<Layer>, AdjustError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(AdjustError::InvalidFactor(factor));
    }
    Ok(layers
        .iter()
        .enumerate()
        .map(|(idx, layer)| {
            let mut adjusted = *layer;
            if selection.includes(idx) {
                adjusted.thickness *= factor;
            }
            adjusted
        })
        .collect())
}

/// Scale factor that moves spectral features by roughly `shift_nm` around the centre of
/// `range`.
pub fn wavelength_shift_scale(range: &WavelengthRange, shift_nm: f64) -> Result<f64, AdjustError> {
    if !shift_nm.is_finite() || shift_nm == 0.0 {
        return Err(AdjustError::InvalidShift(shift_nm));
    }
    let center = range.center();
    Ok((center + shift_nm) / center)
}

pub fn apply_wavelength_shift(
    layers: &[Layer],
    range: &WavelengthRange,
    shift_nm: f64,
) -> Result<Vec<Layer>, AdjustError> {
    let scale = wavelength_shift_scale(range, shift_nm)?;
    apply_thickness_factor(layers, scale, LayerSelection::All)
}

/// Moves a computed curve up by `shift` percentage points, clamping both quantities to
/// `[0, 100]`. Only for display; there is no stack that realizes it.
pub fn vertical_shift_preview(points: &[SpectralPoint], shift: f64) -> Vec<SpectralPoint> {
    points
        .iter()
        .map(|p| SpectralPoint {
            wavelength: p.wavelength,
            reflectivity: (p.reflectivity + shift).clamp(0.0, 100.0),
            transmissivity: (p.transmissivity - shift).clamp(0.0, 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialId;

    fn stack() -> Vec<Layer> {
        vec![
            Layer::new(MaterialId::SiO2, 100.0),
            Layer::new(MaterialId::TiO2, 50.0),
            Layer::new(MaterialId::SiO2, 80.0),
        ]
    }

    fn thicknesses(layers: &[Layer]) -> Vec<f64> {
        layers.iter().map(|l| l.thickness).collect()
    }

    #[test]
    fn factor_applies_to_selected_layers_only() {
        let odd = apply_thickness_factor(&stack(), 2.0, LayerSelection::Odd).unwrap();
        assert_eq!(thicknesses(&odd), vec![200.0, 50.0, 160.0]);

        let even = apply_thickness_factor(&stack(), 0.5, LayerSelection::Even).unwrap();
        assert_eq!(thicknesses(&even), vec![100.0, 25.0, 80.0]);

        let all = apply_thickness_factor(&stack(), 1.5, LayerSelection::All).unwrap();
        assert_eq!(thicknesses(&all), vec![150.0, 75.0, 120.0]);
    }

    #[test]
    fn non_positive_factor_is_rejected() {
        assert_eq!(
            apply_thickness_factor(&stack(), 0.0, LayerSelection::All),
            Err(AdjustError::InvalidFactor(0.0))
        );
        assert!(apply_thickness_factor(&stack(), f64::NAN, LayerSelection::All).is_err());
    }

    #[test]
    fn wavelength_shift_scales_by_center_ratio() {
        let range = WavelengthRange::new(400.0, 800.0, 1.0);
        assert_eq!(wavelength_shift_scale(&range, 60.0), Ok(1.1));
        let shifted = apply_wavelength_shift(&stack(), &range, -120.0).unwrap();
        assert!((shifted[0].thickness - 80.0).abs() < 1e-9);
    }

    #[test]
    fn zero_shift_is_rejected() {
        let range = WavelengthRange::new(400.0, 800.0, 1.0);
        assert_eq!(
            wavelength_shift_scale(&range, 0.0),
            Err(AdjustError::InvalidShift(0.0))
        );
    }

    #[test]
    fn vertical_shift_clamps_to_percent_range() {
        let points = [SpectralPoint {
            wavelength: 500.0,
            reflectivity: 95.0,
            transmissivity: 5.0,
        }];
        let shifted = vertical_shift_preview(&points, 10.0);
        assert_eq!(shifted[0].reflectivity, 100.0);
        assert_eq!(shifted[0].transmissivity, 0.0);
    }

    #[test]
    fn selection_parses_case_insensitively() {
        assert_eq!("Odd".parse::<LayerSelection>(), Ok(LayerSelection::Odd));
        assert!(matches!(
            "third".parse::<LayerSelection>(),
            Err(AdjustError::UnknownSelection(_))
        ));
    }
}
