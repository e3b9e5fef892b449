//! `mineral-dashboard` library crate.
//!
//! The binary (`mdash`) is a thin wrapper around this library so that:
//!
//! - the synthesize -> filter -> chart pipeline is testable without a terminal
//! - any other shell (web, desktop) can call [`chart::render`] directly
//! - presentation code (TUI, ASCII plots, exports) stays out of the pipeline

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;

pub use chart::{ChartSpec, render};
pub use data::Dataset;
pub use domain::{ChartType, Country, FilterSelection, Metric, Mineral, Observation};
