//! Output helpers.
//!
//! - filtered rows as CSV and chart specs as JSON (`export`)

pub mod export;

pub use export::*;
