mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_design_config, build_spectrum_job, build_yield_config};
pub use file::FileConfig;
pub use models::SpectrumJob;
