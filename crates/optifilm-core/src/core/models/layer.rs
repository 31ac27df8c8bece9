use crate::core::materials::MaterialId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IonAssist {
    pub enabled: bool,
    pub ri_increase_percent: f64,
}

impl IonAssist {
    pub fn new(ri_increase_percent: f64) -> Self {
        Self {
            enabled: true,
            ri_increase_percent,
        }
    }

    #[inline]
    pub fn index_multiplier(&self) -> f64 {
        1.0 + self.ri_increase_percent / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub material: MaterialId,
    /// Nominal physical thickness in nm, before tooling correction.
    pub thickness: f64,
    pub ion_assist: Option<IonAssist>,
}

impl Layer {
    pub fn new(material: MaterialId, thickness: f64) -> Self {
        Self {
            material,
            thickness,
            ion_assist: None,
        }
    }

    pub fn with_ion_assist(mut self, settings: IonAssist) -> Self {
        self.ion_assist = Some(settings);
        self
    }

    #[inline]
    pub fn refractive_index(&self, wavelength_nm: f64) -> f64 {
        self.material
            .material()
            .refractive_index(wavelength_nm, self.ion_assist.as_ref())
    }

    pub fn has_active_ion_assist(&self) -> bool {
        self.ion_assist.is_some_and(|settings| settings.enabled)
    }
}

pub fn total_physical_thickness(layers: &[Layer]) -> f64 {
    layers.iter().map(|layer| layer.thickness).sum()
}

/// Σ n(550 nm)·d using the bare dispersion model, ignoring ion assist.
pub fn total_optical_thickness(layers: &[Layer]) -> f64 {
    layers
        .iter()
        .map(|layer| layer.material.material().reference_index() * layer.thickness)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_multiplier_converts_percent_to_factor() {
        assert!((IonAssist::new(2.5).index_multiplier() - 1.025).abs() < 1e-12);
    }

    #[test]
    fn has_active_ion_assist_requires_enabled_flag() {
        let layer = Layer::new(MaterialId::TiO2, 50.0);
        assert!(!layer.has_active_ion_assist());

        let enabled = layer.with_ion_assist(IonAssist::new(4.0));
        assert!(enabled.has_active_ion_assist());

        let disabled = layer.with_ion_assist(IonAssist {
            enabled: false,
            ri_increase_percent: 4.0,
        });
        assert!(!disabled.has_active_ion_assist());
    }

    #[test]
    fn layer_index_includes_ion_assist() {
        let plain = Layer::new(MaterialId::HfO2, 80.0);
        let assisted = plain.with_ion_assist(IonAssist::new(10.0));
        let ratio = assisted.refractive_index(600.0) / plain.refractive_index(600.0);
        assert!((ratio - 1.1).abs() < 1e-12);
    }

    #[test]
    fn thickness_totals_sum_over_layers() {
        let layers = [
            Layer::new(MaterialId::Custom, 100.0),
            Layer::new(MaterialId::Custom, 50.0),
        ];
        assert_eq!(total_physical_thickness(&layers), 150.0);
        assert!((total_optical_thickness(&layers) - 225.0).abs() < 1e-12);
    }

    #[test]
    fn totals_of_empty_stack_are_zero() {
        assert_eq!(total_physical_thickness(&[]), 0.0);
        assert_eq!(total_optical_thickness(&[]), 0.0);
    }
}
