//! Text rendering of chart specs for non-interactive output.

pub mod ascii;

pub use ascii::*;
