//! Shared "selection pipeline" used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset -> filter -> chart specs
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::chart::{ChartSpec, build_charts};
use crate::data::{Dataset, filter_observations};
use crate::domain::{FilterSelection, Observation};

/// Everything one interaction produces.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Filtered rows, backing the raw data table.
    pub rows: Vec<Observation>,
    pub charts: Vec<ChartSpec>,
}

/// Re-run filter and chart selection for the current controls.
pub fn run_selection(dataset: &Dataset, selection: &FilterSelection) -> RunOutput {
    let rows = filter_observations(dataset.observations(), selection);
    let charts = build_charts(&rows, selection);
    RunOutput { rows, charts }
}
