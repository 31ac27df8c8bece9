//! # Models Module
//!
//! Value types shared by every computation in OptiFilm.
//!
//! ## Overview
//!
//! All models are plain, immutable-by-convention values. Workflows clone and perturb
//! them freely; nothing here has identity beyond a single computation.
//!
//! - **Layers** ([`layer`]) - Material, physical thickness, and optional ion-assist settings
//! - **Stacks** ([`stack`]) - Ordered layers together with the incident and substrate media
//! - **Tooling** ([`tooling`]) - Per-material thickness calibration multipliers
//! - **Targets** ([`target`]) - Wavelength/reflectivity windows a design must satisfy
//! - **Spectra** ([`spectrum`]) - Measured or computed samples and wavelength grids
//!
//! ## Conventions
//!
//! Wavelengths and thicknesses are in nanometers. Reflectivity in targets and spectra
//! is expressed in percent (0-100), while the solver works with fractions (0-1).

pub mod layer;
pub mod spectrum;
pub mod stack;
pub mod target;
pub mod tooling;
