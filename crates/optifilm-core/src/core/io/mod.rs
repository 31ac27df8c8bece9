//! Reading and writing spectra as delimited text.
//!
//! Measured spectra arrive as two-column `wavelength,reflectivity` CSV with a header row.
//! Rows that do not parse as two numbers are skipped; a file with no usable rows is an
//! error. Computed sweeps are written back as CSV with a transmissivity column.

pub mod spectrum;
pub mod traits;

pub use spectrum::{SpectrumCsv, SpectrumReadError};
pub use traits::SpectrumFile;
