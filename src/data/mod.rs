//! Dataset construction and row selection.
//!
//! - `sample`: seeded synthesis of the observation table
//! - `filter`: country/mineral narrowing of that table

pub mod filter;
pub mod sample;

pub use filter::*;
pub use sample::*;
