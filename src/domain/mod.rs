//! Domain types used throughout the engine and the programme layer.
//!
//! This module defines:
//!
//! - decay models and their parameters (`DecayModel`, `ExponentialParams`, ...)
//! - engine outputs (`DecayCurve`, `WellbyEstimate`, `DegenerateInput`)
//! - programme configuration and outcomes (`ProgrammeConfig`, `Comparison`, ...)

pub mod types;

pub use types::*;
