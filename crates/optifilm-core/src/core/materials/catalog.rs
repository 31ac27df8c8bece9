use super::dispersion::DispersionModel;
use super::{LOW_INDEX_THRESHOLD, MaterialError, REFERENCE_WAVELENGTH_NM};
use crate::core::models::layer::IonAssist;
use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum MaterialId {
    SiO2,
    SiO,
    TiO2,
    Al2O3,
    ZrO2,
    Ta2O5,
    Nb2O5,
    HfO2,
    MgF2,
    Y2O3,
    Custom,
}

static MATERIAL_IDS: Map<&'static str, MaterialId> = phf_map! {
    "SiO2" => MaterialId::SiO2,
    "SiO" => MaterialId::SiO,
    "TiO2" => MaterialId::TiO2,
    "Al2O3" => MaterialId::Al2O3,
    "ZrO2" => MaterialId::ZrO2,
    "Ta2O5" => MaterialId::Ta2O5,
    "Nb2O5" => MaterialId::Nb2O5,
    "HfO2" => MaterialId::HfO2,
    "MgF2" => MaterialId::MgF2,
    "Y2O3" => MaterialId::Y2O3,
    "Custom" => MaterialId::Custom,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub dispersion: DispersionModel,
    /// Signed intrinsic film stress in MPa; positive is compressive.
    pub intrinsic_stress_mpa: f64,
    pub default_ion_assist_increase_percent: f64,
}

const SIO2: Material = Material {
    id: MaterialId::SiO2,
    dispersion: DispersionModel::Sellmeier {
        b: [0.6961663, 0.4079426, 0.8974794],
        c: [0.0684043, 0.1162414, 9.896161],
    },
    intrinsic_stress_mpa: -50.0,
    default_ion_assist_increase_percent: 3.0,
};

const SIO: Material = Material {
    id: MaterialId::SiO,
    dispersion: DispersionModel::Cauchy {
        a: 1.85,
        b: 0.015,
        c: 0.0001,
    },
    intrinsic_stress_mpa: -80.0,
    default_ion_assist_increase_percent: 2.5,
};

const TIO2: Material = Material {
    id: MaterialId::TiO2,
    dispersion: DispersionModel::Cauchy {
        a: 2.35,
        b: 0.02,
        c: 0.0001,
    },
    intrinsic_stress_mpa: 150.0,
    default_ion_assist_increase_percent: 4.0,
};

const AL2O3: Material = Material {
    id: MaterialId::Al2O3,
    dispersion: DispersionModel::Sellmeier {
        b: [1.4313493, 0.65054713, 5.3414021],
        c: [0.0726631, 0.1193242, 18.028251],
    },
    intrinsic_stress_mpa: -100.0,
    default_ion_assist_increase_percent: 2.0,
};

const ZRO2: Material = Material {
    id: MaterialId::ZrO2,
    dispersion: DispersionModel::Cauchy {
        a: 2.13,
        b: 0.03,
        c: 0.0002,
    },
    intrinsic_stress_mpa: 200.0,
    default_ion_assist_increase_percent: 3.5,
};

const TA2O5: Material = Material {
    id: MaterialId::Ta2O5,
    dispersion: DispersionModel::Cauchy {
        a: 2.1,
        b: 0.025,
        c: 0.00015,
    },
    intrinsic_stress_mpa: 180.0,
    default_ion_assist_increase_percent: 3.0,
};

const NB2O5: Material = Material {
    id: MaterialId::Nb2O5,
    dispersion: DispersionModel::Cauchy {
        a: 2.28,
        b: 0.028,
        c: 0.00018,
    },
    intrinsic_stress_mpa: 170.0,
    default_ion_assist_increase_percent: 3.5,
};

const HFO2: Material = Material {
    id: MaterialId::HfO2,
    dispersion: DispersionModel::Cauchy {
        a: 1.95,
        b: 0.022,
        c: 0.00012,
    },
    intrinsic_stress_mpa: 190.0,
    default_ion_assist_increase_percent: 2.5,
};

const MGF2: Material = Material {
    id: MaterialId::MgF2,
    dispersion: DispersionModel::Sellmeier {
        b: [0.48755108, 0.39875031, 2.3120353],
        c: [0.04338408, 0.09461442, 23.793604],
    },
    intrinsic_stress_mpa: -30.0,
    default_ion_assist_increase_percent: 1.5,
};

const Y2O3: Material = Material {
    id: MaterialId::Y2O3,
    dispersion: DispersionModel::Cauchy {
        a: 1.87,
        b: 0.018,
        c: 0.0001,
    },
    intrinsic_stress_mpa: 120.0,
    default_ion_assist_increase_percent: 2.0,
};

const CUSTOM: Material = Material {
    id: MaterialId::Custom,
    dispersion: DispersionModel::Constant { n: 1.5 },
    intrinsic_stress_mpa: 0.0,
    default_ion_assist_increase_percent: 0.0,
};

impl MaterialId {
    pub const ALL: [MaterialId; 11] = [
        MaterialId::SiO2,
        MaterialId::SiO,
        MaterialId::TiO2,
        MaterialId::Al2O3,
        MaterialId::ZrO2,
        MaterialId::Ta2O5,
        MaterialId::Nb2O5,
        MaterialId::HfO2,
        MaterialId::MgF2,
        MaterialId::Y2O3,
        MaterialId::Custom,
    ];

    pub fn material(self) -> &'static Material {
        match self {
            MaterialId::SiO2 => &SIO2,
            MaterialId::SiO => &SIO,
            MaterialId::TiO2 => &TIO2,
            MaterialId::Al2O3 => &AL2O3,
            MaterialId::ZrO2 => &ZRO2,
            MaterialId::Ta2O5 => &TA2O5,
            MaterialId::Nb2O5 => &NB2O5,
            MaterialId::HfO2 => &HFO2,
            MaterialId::MgF2 => &MGF2,
            MaterialId::Y2O3 => &Y2O3,
            MaterialId::Custom => &CUSTOM,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialId::SiO2 => "SiO2",
            MaterialId::SiO => "SiO",
            MaterialId::TiO2 => "TiO2",
            MaterialId::Al2O3 => "Al2O3",
            MaterialId::ZrO2 => "ZrO2",
            MaterialId::Ta2O5 => "Ta2O5",
            MaterialId::Nb2O5 => "Nb2O5",
            MaterialId::HfO2 => "HfO2",
            MaterialId::MgF2 => "MgF2",
            MaterialId::Y2O3 => "Y2O3",
            MaterialId::Custom => "Custom",
        }
    }
}

impl FromStr for MaterialId {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MATERIAL_IDS
            .get(s.trim())
            .copied()
            .ok_or_else(|| MaterialError::UnknownMaterial(s.to_string()))
    }
}

impl TryFrom<String> for MaterialId {
    type Error = MaterialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MaterialId> for &'static str {
    fn from(id: MaterialId) -> Self {
        id.as_str()
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Material {
    /// Real refractive index at `wavelength_nm`, scaled by the ion-assist multiplier
    /// when the settings are present and enabled.
    #[inline]
    pub fn refractive_index(&self, wavelength_nm: f64, ion_assist: Option<&IonAssist>) -> f64 {
        let base = self.dispersion.index_at(wavelength_nm);
        match ion_assist {
            Some(settings) if settings.enabled => base * settings.index_multiplier(),
            _ => base,
        }
    }

    pub fn reference_index(&self) -> f64 {
        self.refractive_index(REFERENCE_WAVELENGTH_NM, None)
    }

    pub fn is_low_index(&self) -> bool {
        self.reference_index() < LOW_INDEX_THRESHOLD
    }

    pub fn default_ion_assist(&self) -> IonAssist {
        IonAssist::new(self.default_ion_assist_increase_percent)
    }
}
