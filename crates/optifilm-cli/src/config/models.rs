use optifilm::core::models::spectrum::WavelengthRange;
use optifilm::core::models::stack::CoatingStack;
use optifilm::core::models::tooling::ToolingFactors;

/// Fully resolved inputs of the `spectrum` subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumJob {
    pub stack: CoatingStack,
    pub tooling: ToolingFactors,
    pub range: WavelengthRange,
    pub angles: Vec<f64>,
    /// Display-only offset for written curves, percentage points.
    pub vertical_shift: Option<f64>,
}
