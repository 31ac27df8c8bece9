use optifilm::core::materials::MaterialId;
use optifilm::core::models::spectrum::WavelengthRange;

pub struct DefaultsConfig {
    pub wavelength_range: WavelengthRange,
    pub num_runs: usize,
    pub thickness_error_percent: f64,
    pub ri_error_percent: f64,
    pub tooling_error_percent: f64,
    pub design_layers: usize,
    pub design_materials: Vec<MaterialId>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            wavelength_range: WavelengthRange::visible(),
            num_runs: 1000,
            thickness_error_percent: 2.0,
            ri_error_percent: 1.0,
            tooling_error_percent: 0.5,
            design_layers: 5,
            design_materials: vec![MaterialId::SiO2, MaterialId::ZrO2],
        }
    }
}
