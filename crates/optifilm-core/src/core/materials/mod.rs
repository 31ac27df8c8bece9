//! # Materials Module
//!
//! This module holds the fixed catalog of coating materials known to OptiFilm and the
//! dispersion models used to evaluate their real refractive index.
//!
//! ## Overview
//!
//! Every material is identified by a [`MaterialId`] and carries:
//!
//! - **A dispersion model** ([`DispersionModel`]) - Sellmeier, Cauchy, or a constant index
//! - **An intrinsic film stress** in MPa (positive is compressive, negative is tensile)
//! - **A default ion-assist RI increase** used as a starting value for process settings
//!
//! Wavelengths are given in nanometers at the API boundary and converted to micrometers
//! internally, which is the unit the dispersion coefficients are tabulated in.
//!
//! ## Usage
//!
//! ```ignore
//! use optifilm::core::materials::{refractive_index, MaterialId};
//!
//! let n = refractive_index("SiO2", 550.0, None)?;
//! let n_zr = MaterialId::ZrO2.material().refractive_index(550.0, None);
//! ```

mod catalog;
mod dispersion;

pub use catalog::{Material, MaterialId};
pub use dispersion::DispersionModel;

use crate::core::models::layer::IonAssist;
use thiserror::Error;

/// Index at 550 nm separating low-index from high-index materials.
pub const LOW_INDEX_THRESHOLD: f64 = 1.8;

/// Reference wavelength for optical thickness and index classification.
pub const REFERENCE_WAVELENGTH_NM: f64 = 550.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MaterialError {
    #[error("Unknown material: '{0}'")]
    UnknownMaterial(String),
}

/// Looks up `material` by name and evaluates its refractive index.
pub fn refractive_index(
    material: &str,
    wavelength_nm: f64,
    ion_assist: Option<&IonAssist>,
) -> Result<f64, MaterialError> {
    let id: MaterialId = material.parse()?;
    Ok(id.material().refractive_index(wavelength_nm, ion_assist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refractive_index_resolves_material_by_name() {
        let by_name = refractive_index("ZrO2", 550.0, None).unwrap();
        let by_id = MaterialId::ZrO2.material().refractive_index(550.0, None);
        assert_eq!(by_name, by_id);
    }

    #[test]
    fn refractive_index_rejects_unknown_material() {
        let result = refractive_index("Unobtainium", 550.0, None);
        assert_eq!(
            result,
            Err(MaterialError::UnknownMaterial("Unobtainium".to_string()))
        );
    }

    #[test]
    fn refractive_index_is_finite_and_positive_across_visible_and_nir() {
        for id in MaterialId::ALL {
            let mut wavelength = 380.0;
            while wavelength <= 1100.0 {
                let n = id.material().refractive_index(wavelength, None);
                assert!(n.is_finite() && n > 0.0, "{id} at {wavelength} nm gave {n}");
                wavelength += 10.0;
            }
        }
    }

    #[test]
    fn low_index_classification_matches_catalog_expectations() {
        let low: Vec<_> = MaterialId::ALL
            .into_iter()
            .filter(|id| id.material().is_low_index())
            .collect();
        assert!(low.contains(&MaterialId::SiO2));
        assert!(low.contains(&MaterialId::MgF2));
        assert!(low.contains(&MaterialId::Custom));
        assert!(!low.contains(&MaterialId::Al2O3));
        assert!(!low.contains(&MaterialId::ZrO2));
        assert!(!low.contains(&MaterialId::TiO2));
    }
}
