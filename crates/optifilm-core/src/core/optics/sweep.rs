use super::solver::reflectance;
use crate::core::models::layer::Layer;
use crate::core::models::spectrum::{SpectralPoint, WavelengthRange};
use crate::core::models::stack::Media;
use crate::core::models::tooling::ToolingFactors;

/// Reflectance and transmittance, in percent, at every wavelength of `range`.
pub fn sweep(
    layers: &[Layer],
    media: &Media,
    tooling: &ToolingFactors,
    range: &WavelengthRange,
    angle_deg: f64,
) -> Vec<SpectralPoint> {
    range
        .iter()
        .map(|wavelength| {
            let r = reflectance(layers, media, tooling, wavelength, angle_deg);
            SpectralPoint {
                wavelength,
                reflectivity: r * 100.0,
                transmissivity: (1.0 - r) * 100.0,
            }
        })
        .collect()
}

/// Reflectance in percent at a single wavelength.
#[inline]
pub fn reflectivity_percent(
    layers: &[Layer],
    media: &Media,
    tooling: &ToolingFactors,
    wavelength_nm: f64,
) -> f64 {
    reflectance(layers, media, tooling, wavelength_nm, 0.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialId;

    #[test]
    fn sweep_covers_every_grid_point() {
        let layers = [Layer::new(MaterialId::TiO2, 60.0)];
        let range = WavelengthRange::new(400.0, 800.0, 10.0);
        let points = sweep(&layers, &Media::default(), &ToolingFactors::new(), &range, 0.0);
        assert_eq!(points.len(), 41);
        assert_eq!(points[0].wavelength, 400.0);
        assert_eq!(points[40].wavelength, 800.0);
    }

    #[test]
    fn reflectivity_and_transmissivity_sum_to_one_hundred() {
        let layers = [
            Layer::new(MaterialId::SiO2, 90.0),
            Layer::new(MaterialId::Nb2O5, 55.0),
        ];
        let range = WavelengthRange::new(380.0, 780.0, 20.0);
        for point in sweep(&layers, &Media::default(), &ToolingFactors::new(), &range, 30.0) {
            assert!((point.reflectivity + point.transmissivity - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn invalid_range_yields_empty_sweep() {
        let range = WavelengthRange::new(800.0, 400.0, 10.0);
        assert!(sweep(&[], &Media::default(), &ToolingFactors::new(), &range, 0.0).is_empty());
    }

    #[test]
    fn point_reflectivity_matches_sweep() {
        let layers = [Layer::new(MaterialId::ZrO2, 70.0)];
        let media = Media::default();
        let tooling = ToolingFactors::new();
        let range = WavelengthRange::new(550.0, 550.0, 1.0);
        let swept = sweep(&layers, &media, &tooling, &range, 0.0);
        assert_eq!(
            swept[0].reflectivity,
            reflectivity_percent(&layers, &media, &tooling, 550.0)
        );
    }
}
