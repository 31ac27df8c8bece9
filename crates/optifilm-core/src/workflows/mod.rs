//! # Workflows Module
//!
//! High-level entry points of the OptiFilm library. Each workflow validates its inputs,
//! drives the engine tasks, reports progress, and returns a self-contained result that
//! callers can render or serialize.
//!
//! ## Available Workflows
//!
//! - **Spectrum** ([`spectrum`]) - Reflectance/transmittance sweeps at one or more
//!   incidence angles, with perceived color, film stress, and an optional comparison
//!   against a measured spectrum.
//! - **Yield Analysis** ([`yield_analysis`]) - Monte Carlo simulation of thickness,
//!   index, and tooling errors, reporting pass rate, error statistics, a histogram, and
//!   example runs.
//! - **Design** ([`design`]) - Stochastic search for alternating low/high-index stacks
//!   that meet target windows or reproduce a measured spectrum.
//! - **Tracking** ([`tracking`]) - Run-to-run statistics over several measured spectra
//!   of the same coating, read from CSV files.
//!
//! ## Long-running Work
//!
//! The yield and design workflows accept a [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and a [`CancellationToken`](crate::engine::progress::CancellationToken). They emit
//! `Checkpoint` events with a non-decreasing overall percentage and stop with
//! `EngineError::Cancelled` at the next checkpoint after the token is tripped.

pub mod design;
pub mod spectrum;
pub mod tracking;
pub mod yield_analysis;
