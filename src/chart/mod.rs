//! Chart selection: filtered rows in, declarative chart specs out.
//!
//! [`render`] is the single entry point every front end calls after a control
//! changes. It is pure: same dataset and selection, same specs.

use tracing::debug;

use crate::data::{Dataset, filter_observations};
use crate::domain::FilterSelection;

pub mod select;
pub mod spec;

pub use select::*;
pub use spec::*;

/// Filter the dataset to `selection` and build its charts.
pub fn render(dataset: &Dataset, selection: &FilterSelection) -> Vec<ChartSpec> {
    let rows = filter_observations(dataset.observations(), selection);
    let charts = build_charts(&rows, selection);
    debug!(chart = ?selection.chart, charts = charts.len(), "built chart specs");
    charts
}
