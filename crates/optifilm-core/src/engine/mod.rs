//! # Engine Module
//!
//! Orchestration layer between the pure models in [`crate::core`] and the public
//! workflows. Nothing here touches files or terminals; it owns configuration,
//! progress reporting, cancellation, and the computational tasks the yield simulator
//! and the design optimizer are assembled from.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated builders for yield and design runs
//! - **Error Handling** ([`error`]) - Engine-level error type aggregating lower layers
//! - **Progress Monitoring** ([`progress`]) - Phase and percentage events plus the
//!   cooperative cancellation token
//! - **State Tracking** ([`state`]) - Bounded best-k collections used for candidate
//!   pools, finalists, and retained examples
//! - **Tasks** - Scoring, candidate generation, refinement, and per-run yield evaluation
//!
//! ## Determinism
//!
//! All random draws are made sequentially from one seedable generator. Only the
//! evaluation of already-drawn candidates is fanned out (with the `parallel` feature),
//! so a seeded run gives the same result on any number of threads.

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
pub(crate) mod utils;
