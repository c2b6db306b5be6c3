//! Decay model implementations.
//!
//! Models are implemented as small, pure functions so that the integrator and
//! the chart sampler can stay generic over the selected model.

pub mod decay;

pub use decay::*;
