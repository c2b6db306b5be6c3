//! Input/output helpers.
//!
//! - programme configuration loading (`config`)
//! - comparison exports (CSV/JSON) (`export`)

pub mod config;
pub mod export;

pub use config::*;
pub use export::*;
