use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One measured or computed reflectance sample; reflectivity in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSample {
    pub wavelength: f64,
    pub reflectivity: f64,
}

impl SpectrumSample {
    pub fn new(wavelength: f64, reflectivity: f64) -> Self {
        Self {
            wavelength,
            reflectivity,
        }
    }
}

/// A computed point on a spectral sweep, both quantities in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralPoint {
    pub wavelength: f64,
    pub reflectivity: f64,
    pub transmissivity: f64,
}

impl From<SpectralPoint> for SpectrumSample {
    fn from(point: SpectralPoint) -> Self {
        SpectrumSample::new(point.wavelength, point.reflectivity)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RangeError {
    #[error("Wavelength range bounds must be finite and positive (min {min}, max {max})")]
    InvalidBounds { min: f64, max: f64 },
    #[error("Inverted wavelength range: min {min} nm > max {max} nm")]
    Inverted { min: f64, max: f64 },
    #[error("Wavelength step must be finite and positive, got {0}")]
    InvalidStep(f64),
    #[error("Wavelength step {step} nm gives {points} grid points; at most {limit} are allowed")]
    TooManyPoints { step: f64, points: f64, limit: usize },
}

/// Upper bound on grid points of a single range.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Inclusive wavelength grid `min, min + step, ...` not exceeding `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavelengthRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl WavelengthRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// The visible band used by colorimetry.
    pub fn visible() -> Self {
        Self::new(380.0, 780.0, 5.0)
    }

    pub fn validate(&self) -> Result<(), RangeError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min <= 0.0 {
            return Err(RangeError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        if self.min > self.max {
            return Err(RangeError::Inverted {
                min: self.min,
                max: self.max,
            });
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(RangeError::InvalidStep(self.step));
        }
        let points = self.raw_point_count();
        if points > MAX_GRID_POINTS as f64 {
            return Err(RangeError::TooManyPoints {
                step: self.step,
                points,
                limit: MAX_GRID_POINTS,
            });
        }
        Ok(())
    }

    fn raw_point_count(&self) -> f64 {
        ((self.max - self.min) / self.step + 1e-9).floor() + 1.0
    }

    /// Number of grid points. Computed from indices so accumulated rounding never drops
    /// the final point.
    pub fn len(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        self.raw_point_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// The same bounds sampled `factor` times more coarsely.
    pub fn coarsened(&self, factor: f64) -> Self {
        Self::new(self.min, self.max, self.step * factor)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.min + i as f64 * self.step)
    }

    pub fn wavelengths(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_inclusive_of_both_ends() {
        let range = WavelengthRange::new(400.0, 410.0, 2.5);
        assert_eq!(range.wavelengths(), vec![400.0, 402.5, 405.0, 407.5, 410.0]);
    }

    #[test]
    fn grid_stops_before_exceeding_max() {
        let range = WavelengthRange::new(400.0, 409.0, 2.0);
        assert_eq!(range.len(), 5);
        assert_eq!(range.wavelengths().last(), Some(&408.0));
    }

    #[test]
    fn single_point_range_has_one_sample() {
        let range = WavelengthRange::new(550.0, 550.0, 1.0);
        assert_eq!(range.wavelengths(), vec![550.0]);
    }

    #[test]
    fn fractional_step_keeps_final_point() {
        let range = WavelengthRange::new(380.0, 780.0, 0.1);
        assert_eq!(range.len(), 4001);
    }

    #[test]
    fn invalid_ranges_are_empty_and_rejected() {
        let zero_step = WavelengthRange::new(400.0, 500.0, 0.0);
        assert_eq!(zero_step.validate(), Err(RangeError::InvalidStep(0.0)));
        assert!(zero_step.is_empty());

        let inverted = WavelengthRange::new(500.0, 400.0, 1.0);
        assert!(matches!(inverted.validate(), Err(RangeError::Inverted { .. })));
        assert!(inverted.is_empty());
    }

    #[test]
    fn oversized_grid_is_rejected_and_empty() {
        let tiny_step = WavelengthRange::new(400.0, 800.0, 1e-9);
        assert!(matches!(
            tiny_step.validate(),
            Err(RangeError::TooManyPoints { limit: MAX_GRID_POINTS, .. })
        ));
        assert!(tiny_step.is_empty());

        let at_limit = WavelengthRange::new(1.0, 1.0 + (MAX_GRID_POINTS - 1) as f64, 1.0);
        assert_eq!(at_limit.validate(), Ok(()));
        assert_eq!(at_limit.len(), MAX_GRID_POINTS);
    }

    #[test]
    fn coarsened_range_doubles_step() {
        let range = WavelengthRange::new(400.0, 800.0, 1.0).coarsened(2.0);
        assert_eq!(range.step, 2.0);
        assert_eq!(range.len(), 201);
    }
}
