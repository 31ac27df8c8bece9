use crate::core::analysis::tracking::{TrackingPoint, average_std_dev, tracking_statistics};
use crate::core::io::{SpectrumCsv, SpectrumFile};
use crate::core::models::spectrum::SpectrumSample;
use crate::engine::config::ConfigError;
use crate::engine::error::EngineError;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingResult {
    pub run_count: usize,
    pub points: Vec<TrackingPoint>,
    /// Mean of the per-wavelength standard deviations, percentage points.
    pub average_std_dev: Option<f64>,
}

/// Reads every measured run from CSV and computes per-wavelength statistics across them.
///
/// The first unreadable file aborts the workflow with [`EngineError::Spectrum`].
#[instrument(skip_all, name = "tracking_workflow")]
pub fn run<P: AsRef<Path>>(paths: &[P]) -> Result<TrackingResult, EngineError> {
    let runs = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let samples =
                SpectrumCsv::read_from_path(path).map_err(|source| EngineError::Spectrum {
                    path: path.to_path_buf(),
                    source,
                })?;
            debug!(path = %path.display(), samples = samples.len(), "Loaded measured run.");
            Ok(samples)
        })
        .collect::<Result<Vec<_>, EngineError>>()?;
    from_samples(&runs)
}

/// Same as [`run`] for runs that are already in memory.
pub fn from_samples(runs: &[Vec<SpectrumSample>]) -> Result<TrackingResult, EngineError> {
    if runs.is_empty() {
        return Err(ConfigError::MissingParameter("runs").into());
    }
    let points = tracking_statistics(runs);
    let average_std_dev = average_std_dev(&points);
    info!(
        runs = runs.len(),
        points = points.len(),
        "Computed run-to-run statistics."
    );
    Ok(TrackingResult {
        run_count: runs.len(),
        points,
        average_std_dev,
    })
}
