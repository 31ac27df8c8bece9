//! Utility functions for the engine module.
//!
//! Currently this holds the random perturbation samplers shared by the yield simulator
//! and the design optimizer.

pub mod sampling;
