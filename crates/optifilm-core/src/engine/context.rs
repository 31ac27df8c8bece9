use super::config::{DesignConfig, YieldConfig};
use super::error::EngineError;
use super::progress::{CancellationToken, Progress, ProgressReporter};
use crate::core::models::stack::Media;
use crate::core::models::tooling::ToolingFactors;

/// Optical environment every evaluation in a run shares.
pub trait ProvidesOptics {
    fn media(&self) -> &Media;
    fn tooling(&self) -> &ToolingFactors;
}

impl ProvidesOptics for YieldConfig {
    fn media(&self) -> &Media {
        &self.media
    }
    fn tooling(&self) -> &ToolingFactors {
        &self.tooling
    }
}

impl ProvidesOptics for DesignConfig {
    fn media(&self) -> &Media {
        &self.media
    }
    fn tooling(&self) -> &ToolingFactors {
        &self.tooling
    }
}

#[derive(Clone, Copy)]
pub struct OptimizationContext<'a, C>
where
    C: ProvidesOptics + Sync,
{
    pub config: &'a C,
    pub reporter: &'a ProgressReporter<'a>,
    pub cancellation: &'a CancellationToken,
}

impl<'a, C> OptimizationContext<'a, C>
where
    C: ProvidesOptics + Sync,
{
    pub fn new(
        config: &'a C,
        reporter: &'a ProgressReporter<'a>,
        cancellation: &'a CancellationToken,
    ) -> Self {
        Self {
            config,
            reporter,
            cancellation,
        }
    }

    /// Reports overall progress and honours a pending cancellation.
    pub fn checkpoint(&self, phase: &'static str, percent: f64) -> Result<(), EngineError> {
        self.cancellation.check(phase)?;
        self.reporter.report(Progress::Checkpoint { phase, percent });
        Ok(())
    }
}
