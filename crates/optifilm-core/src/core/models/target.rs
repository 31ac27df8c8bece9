use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TargetError {
    #[error("Target bound '{field}' is not a finite number")]
    NonFinite { field: &'static str },
    #[error("Inverted wavelength bounds: min {min} nm > max {max} nm")]
    InvertedWavelength { min: f64, max: f64 },
    #[error("Inverted reflectivity bounds: min {min}% > max {max}%")]
    InvertedReflectivity { min: f64, max: f64 },
    #[error("Wavelength must be positive, got {0} nm")]
    NonPositiveWavelength(f64),
}

/// A rectangular acceptance region in (wavelength, reflectivity) space.
///
/// Wavelengths are in nm, reflectivity bounds in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetWindow {
    pub wavelength_min: f64,
    pub wavelength_max: f64,
    pub reflectivity_min: f64,
    pub reflectivity_max: f64,
}

const RANGE_SAMPLES: usize = 5;

impl TargetWindow {
    pub fn new(
        wavelength_min: f64,
        wavelength_max: f64,
        reflectivity_min: f64,
        reflectivity_max: f64,
    ) -> Self {
        Self {
            wavelength_min,
            wavelength_max,
            reflectivity_min,
            reflectivity_max,
        }
    }

    /// A single-wavelength target with a reflectivity band.
    pub fn at_wavelength(wavelength: f64, reflectivity_min: f64, reflectivity_max: f64) -> Self {
        Self::new(wavelength, wavelength, reflectivity_min, reflectivity_max)
    }

    pub fn validate(&self) -> Result<(), TargetError> {
        let fields = [
            ("wavelength_min", self.wavelength_min),
            ("wavelength_max", self.wavelength_max),
            ("reflectivity_min", self.reflectivity_min),
            ("reflectivity_max", self.reflectivity_max),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(TargetError::NonFinite { field });
        }
        if self.wavelength_min <= 0.0 {
            return Err(TargetError::NonPositiveWavelength(self.wavelength_min));
        }
        if self.wavelength_min > self.wavelength_max {
            return Err(TargetError::InvertedWavelength {
                min: self.wavelength_min,
                max: self.wavelength_max,
            });
        }
        if self.reflectivity_min > self.reflectivity_max {
            return Err(TargetError::InvertedReflectivity {
                min: self.reflectivity_min,
                max: self.reflectivity_max,
            });
        }
        Ok(())
    }

    pub fn is_single_wavelength(&self) -> bool {
        self.wavelength_min == self.wavelength_max
    }

    pub fn is_reflectivity_range(&self) -> bool {
        self.reflectivity_min < self.reflectivity_max
    }

    pub fn midpoint_wavelength(&self) -> f64 {
        (self.wavelength_min + self.wavelength_max) / 2.0
    }

    pub fn midpoint_reflectivity(&self) -> f64 {
        (self.reflectivity_min + self.reflectivity_max) / 2.0
    }

    /// Wavelengths checked against this window: one point for a single-wavelength
    /// window, otherwise five evenly spaced points including both ends.
    pub fn sample_wavelengths(&self) -> Vec<f64> {
        if self.is_single_wavelength() {
            return vec![self.wavelength_min];
        }
        let span = self.wavelength_max - self.wavelength_min;
        (0..RANGE_SAMPLES)
            .map(|i| self.wavelength_min + span * i as f64 / (RANGE_SAMPLES - 1) as f64)
            .collect()
    }

    /// Distance (percentage points) by which `reflectivity` lies outside the band; 0 inside.
    pub fn excursion(&self, reflectivity: f64) -> f64 {
        (self.reflectivity_min - reflectivity)
            .max(reflectivity - self.reflectivity_max)
            .max(0.0)
    }

    pub fn contains(&self, reflectivity: f64) -> bool {
        reflectivity >= self.reflectivity_min && reflectivity <= self.reflectivity_max
    }
}

pub fn validate_targets(targets: &[TargetWindow]) -> Result<(), TargetError> {
    targets.iter().try_for_each(TargetWindow::validate)
}
