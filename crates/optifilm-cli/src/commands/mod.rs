pub mod design;
pub mod materials;
pub mod spectrum;
pub mod track;
pub mod yield_cmd;

use crate::error::{CliError, Result};
use optifilm::core::io::{SpectrumCsv, SpectrumFile};
use optifilm::core::models::spectrum::SpectrumSample;
use optifilm::engine::progress::CancellationToken;
use std::path::Path;
use tracing::{info, warn};

pub(crate) fn load_reference(path: &Path) -> Result<Vec<SpectrumSample>> {
    info!("Loading measured spectrum from {:?}", path);
    let samples = SpectrumCsv::read_from_path(path).map_err(|source| CliError::Spectrum {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} spectrum samples.", samples.len());
    Ok(samples)
}

/// Returns a token that trips on the first Ctrl-C so long runs stop at their next checkpoint.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling at the next checkpoint.");
            handle.cancel();
        }
    });
    token
}
