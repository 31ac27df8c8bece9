use super::layer::Layer;
use serde::{Deserialize, Serialize};

/// Refractive indices of the ambient (incident) medium and the substrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub incident: f64,
    pub substrate: f64,
}

impl Media {
    pub fn new(incident: f64, substrate: f64) -> Self {
        Self {
            incident,
            substrate,
        }
    }
}

impl Default for Media {
    /// Air over crown glass.
    fn default() -> Self {
        Self::new(1.0, 1.52)
    }
}

/// An ordered coating on a substrate.
///
/// `layers[0]` is deposited first and sits on the substrate; the last layer faces the
/// incident medium.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoatingStack {
    pub layers: Vec<Layer>,
    pub media: Media,
}

impl CoatingStack {
    pub fn new(layers: Vec<Layer>, media: Media) -> Self {
        Self { layers, media }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
