//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed selection domains (`Country`, `Mineral`, `Metric`, `ChartType`)
//! - synthesized rows (`Observation`)
//! - UI state (`FilterSelection`) and dataset settings (`DashboardConfig`)

pub mod types;

pub use types::*;
