//! # Core Module
//!
//! Stateless models and pure numerical routines for thin-film coating analysis. Nothing
//! in this layer keeps state between calls, so every function is safe to call from
//! multiple threads at once.
//!
//! ## Architecture
//!
//! - **Materials** ([`materials`]) - Catalog of coating materials and their dispersion models
//! - **Models** ([`models`]) - Layers, stacks, tooling factors, targets, and spectra
//! - **Optics** ([`optics`]) - Transfer-matrix reflectance/transmittance solver and sweeps
//! - **Color** ([`color`]) - Spectrum → CIE XYZ/Lab/LCh → sRGB conversion and naming
//! - **Stress** ([`stress`]) - Intrinsic film stress accumulation and risk classification
//! - **Analysis** ([`analysis`]) - Reference comparison, run tracking, thickness adjustment
//! - **I/O** ([`io`]) - Delimited-text spectrum reading and writing
//!
//! ## Units
//!
//! Wavelengths and thicknesses are nanometers throughout. The solver returns fractions in
//! `[0, 1]`; spectra, targets, and colorimetry inputs carry percentages.

pub mod analysis;
pub mod color;
pub mod io;
pub mod materials;
pub mod models;
pub mod optics;
pub mod stress;
