//! Computational building blocks shared by the workflows.
//!
//! Each task is a pure function of its inputs plus, where randomness is involved, an
//! explicit `&mut impl Rng`. Workflows own the random generator, the progress reporting,
//! and the parallel fan-out; tasks only score, generate, refine, or evaluate.
//!
//! - [`scoring`] turns a candidate stack into a scalar objective (fit error plus
//!   smoothness, peak, and thickness penalties).
//! - [`generation`] splits materials into index classes and draws alternating stacks.
//! - [`refinement`] runs the multi-stage greedy thickness jitter.
//! - [`yield_eval`] realizes one perturbed deposition and checks it against targets.

pub mod generation;
pub mod refinement;
pub mod scoring;
pub mod yield_eval;
