//! # Analysis Module
//!
//! Post-processing helpers that sit between measured data and designed stacks.
//!
//! - **Reference comparison** ([`compare`]) - RMS deviation between a computed curve and a
//!   measured spectrum.
//! - **Run tracking** ([`tracking`]) - Per-wavelength statistics over repeated production
//!   measurements.
//! - **Thickness adjustment** ([`adjust`]) - Uniform or alternating thickness scaling, the
//!   thickness change that moves a spectral feature by a given amount, and a vertical
//!   shift preview.

pub mod adjust;
pub mod compare;
pub mod tracking;
