use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::SpectrumReadError;
use crate::core::materials::MaterialError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexClass {
    Low,
    High,
}

impl fmt::Display for IndexClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexClass::Low => f.write_str("low-index (n < 1.8)"),
            IndexClass::High => f.write_str("high-index (n >= 1.8)"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Material error: {source}")]
    Material {
        #[from]
        source: MaterialError,
    },

    #[error("No {missing} material selected; alternating designs need both index classes")]
    EmptyMaterialPool { missing: IndexClass },

    #[error(
        "No solution reached an error below {threshold}. Best error achieved: {best_error:.2}. Try more layers, different materials, adjusted targets, or another run"
    )]
    NoAcceptableSolution { best_error: f64, threshold: f64 },

    #[error("Failed to read measured run '{path}': {source}", path = path.display())]
    Spectrum {
        path: PathBuf,
        #[source]
        source: SpectrumReadError,
    },

    #[error("Cancelled during phase '{phase}'")]
    Cancelled { phase: &'static str },
}
