//! # Optics Module
//!
//! Thin-film optics for lossless dielectric stacks using the characteristic (transfer)
//! matrix method.
//!
//! ## Overview
//!
//! Each layer is represented by a 2×2 complex matrix
//!
//! ```text
//! | cos δ        i·sin δ / η |
//! | i·η·sin δ    cos δ       |
//! ```
//!
//! with phase thickness `δ = 2π·n·d·cos θ / λ` and tilted admittance `η` (`n·cos θ` for
//! s-polarized light, `n / cos θ` for p-polarized light). The stack matrix is the ordered
//! product from the incident side down to the substrate. Reflectance follows from the
//! admittance formula and is clamped to `[0, 1]`.
//!
//! ## Components
//!
//! - **Matrices** ([`matrix`]) - Layer matrices, polarization admittances, and stack products
//! - **Solver** ([`solver`]) - Reflectance and transmittance at a single wavelength and angle
//! - **Sweeps** ([`sweep`]) - Reflectance/transmittance curves over a wavelength grid
//!
//! ## Approximations
//!
//! - No absorption: transmittance is always `1 - R`.
//! - If Snell's law yields `sin θ > 1` in any layer or the substrate, the solver reports
//!   zero reflectance instead of modeling evanescent waves.
//! - Any other degenerate geometry also yields zero; the solver never returns an error.

pub mod matrix;
pub mod solver;
pub mod sweep;

pub use solver::{reflectance, transmittance};
pub use sweep::sweep;
