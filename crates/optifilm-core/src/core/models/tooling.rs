use crate::core::materials::MaterialId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Machine-specific thickness calibration. Materials without an entry use 1.0.
///
/// Backed by an ordered map so that iteration (and therefore any random draws made
/// per material) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolingFactors {
    factors: BTreeMap<MaterialId, f64>,
}

impl ToolingFactors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factor(mut self, material: MaterialId, factor: f64) -> Self {
        self.set(material, factor);
        self
    }

    pub fn set(&mut self, material: MaterialId, factor: f64) {
        self.factors.insert(material, factor);
    }

    #[inline]
    pub fn factor_for(&self, material: MaterialId) -> f64 {
        self.factors.get(&material).copied().unwrap_or(1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, f64)> + '_ {
        self.factors.iter().map(|(&id, &factor)| (id, factor))
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl FromIterator<(MaterialId, f64)> for ToolingFactors {
    fn from_iter<I: IntoIterator<Item = (MaterialId, f64)>>(iter: I) -> Self {
        Self {
            factors: iter.into_iter().collect(),
        }
    }
}
