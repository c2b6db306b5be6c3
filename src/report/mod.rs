//! Terminal reports for comparisons, decay curves and session costs.
//!
//! Formatting lives here so the engine stays free of presentation concerns.

pub mod format;

pub use format::*;
