use crate::error::{CliError, Result};
use optifilm::core::materials::MaterialId;
use optifilm::core::models::tooling::ToolingFactors;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FileMedia {
    pub incident: Option<f64>,
    pub substrate: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileIonAssist {
    pub enabled: Option<bool>,
    /// Falls back to the material's catalog default.
    pub ri_increase: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileLayer {
    pub material: MaterialId,
    pub thickness: f64,
    pub ion_assist: Option<FileIonAssist>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileTarget {
    pub wavelength_min: f64,
    /// Omitted for a single-wavelength target.
    pub wavelength_max: Option<f64>,
    pub reflectivity_min: f64,
    pub reflectivity_max: f64,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FileWavelengthRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileMonteCarlo {
    pub runs: Option<usize>,
    pub thickness_error: Option<f64>,
    pub ri_error: Option<f64>,
    pub tooling_error: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FileAdhesion {
    pub material: MaterialId,
    pub thickness: f64,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDesign {
    pub layers: Option<usize>,
    pub materials: Option<Vec<MaterialId>>,
    pub iterations: Option<usize>,
    pub top_candidates: Option<usize>,
    pub smoothness_weight: Option<f64>,
    pub adhesion: Option<FileAdhesion>,
    pub acceptance_threshold: Option<f64>,
    pub num_solutions: Option<usize>,
    pub seed: Option<u64>,
}

/// One TOML document shape shared by every subcommand; each reads the sections it needs.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub media: Option<FileMedia>,
    pub tooling: Option<ToolingFactors>,
    #[serde(default)]
    pub layers: Vec<FileLayer>,
    #[serde(default)]
    pub targets: Vec<FileTarget>,
    pub wavelength: Option<FileWavelengthRange>,
    pub monte_carlo: Option<FileMonteCarlo>,
    pub design: Option<FileDesign>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
