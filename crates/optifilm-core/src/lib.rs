//! # OptiFilm Core Library
//!
//! Analysis and design of multilayer dielectric thin-film optical coatings: reflectance
//! spectra, perceived color, film stress, manufacturing yield, and automated stack design.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`Layer`, `TargetWindow`,
//!   `WavelengthRange`) and pure numerical routines: the material dispersion catalog, the
//!   transfer-matrix solver, colorimetry, and the stress estimator.
//!
//! - **[`engine`]: The Logic Core.** Building blocks for long-running computations:
//!   validated configurations, progress reporting with cooperative cancellation, bounded
//!   best-of sets, random perturbation sampling, and the scoring/generation/refinement
//!   tasks used by the optimizer and the yield simulator.
//!
//! - **[`workflows`]: The Public API.** Complete procedures (`spectrum::run`,
//!   `yield_analysis::run`, `design::run`) that tie the engine and core together and are the
//!   intended entry points for applications.

pub mod core;
pub mod engine;
pub mod workflows;
