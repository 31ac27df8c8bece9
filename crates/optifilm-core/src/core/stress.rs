//! Intrinsic film stress estimate for a coating stack.
//!
//! Each layer contributes `σ·d` (MPa·nm) from the intrinsic stress of its material;
//! the running sum over the stack gives the net force per unit width the coating
//! exerts on the substrate. The magnitude of the final sum drives a coarse
//! delamination-risk classification.

use crate::core::materials::MaterialId;
use crate::core::models::layer::{Layer, total_optical_thickness, total_physical_thickness};
use serde::Serialize;
use std::fmt;

const MEDIUM_RISK_THRESHOLD: f64 = 50_000.0;
const HIGH_RISK_THRESHOLD: f64 = 150_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StressType {
    Compressive,
    Tensile,
    Neutral,
}

impl StressType {
    pub fn from_intrinsic(stress_mpa: f64) -> Self {
        if stress_mpa > 0.0 {
            StressType::Compressive
        } else if stress_mpa < 0.0 {
            StressType::Tensile
        } else {
            StressType::Neutral
        }
    }
}

impl fmt::Display for StressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StressType::Compressive => "Compressive",
            StressType::Tensile => "Tensile",
            StressType::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn classify(stress_magnitude: f64) -> Self {
        if stress_magnitude < MEDIUM_RISK_THRESHOLD {
            RiskLevel::Low
        } else if stress_magnitude < HIGH_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Safe for production. No annealing required.",
            RiskLevel::Medium => {
                "Monitor adhesion in production. Consider post-deposition annealing at 150°C for 2 hours to reduce stress."
            }
            RiskLevel::High => {
                "High risk of delamination. REDESIGN RECOMMENDED: Balance high-stress materials with low-stress materials, reduce layer thicknesses, or use annealing at 150-200°C."
            }
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerStress {
    /// 1-based position in the stack.
    pub layer_number: usize,
    pub material: MaterialId,
    pub thickness: f64,
    pub intrinsic_stress: f64,
    pub stress_force: f64,
    pub cumulative_stress: f64,
    pub stress_type: StressType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressResult {
    pub layers: Vec<LayerStress>,
    /// Signed net stress, MPa·nm.
    pub total_stress: f64,
    pub total_stress_magnitude: f64,
    pub total_physical_thickness: f64,
    pub total_optical_thickness: f64,
    pub risk_level: RiskLevel,
}

impl StressResult {
    pub fn recommendation(&self) -> &'static str {
        self.risk_level.recommendation()
    }
}

pub fn coating_stress(layers: &[Layer]) -> StressResult {
    let mut cumulative_stress = 0.0;
    let per_layer = layers
        .iter()
        .enumerate()
        .map(|(idx, layer)| {
            let intrinsic_stress = layer.material.material().intrinsic_stress_mpa;
            let stress_force = intrinsic_stress * layer.thickness;
            cumulative_stress += stress_force;
            LayerStress {
                layer_number: idx + 1,
                material: layer.material,
                thickness: layer.thickness,
                intrinsic_stress,
                stress_force,
                cumulative_stress,
                stress_type: StressType::from_intrinsic(intrinsic_stress),
            }
        })
        .collect();

    let magnitude = cumulative_stress.abs();
    StressResult {
        layers: per_layer,
        total_stress: cumulative_stress,
        total_stress_magnitude: magnitude,
        total_physical_thickness: total_physical_thickness(layers),
        total_optical_thickness: total_optical_thickness(layers),
        risk_level: RiskLevel::classify(magnitude),
    }
}
