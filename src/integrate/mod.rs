//! WELLBY integration.
//!
//! Responsibilities:
//!
//! - combine the peak weekly gain with a decay model over the horizon
//! - keep the degraded custom-curve fallback explicit and distinguishable

pub mod wellby;

pub use wellby::*;
