//! Programme-level aggregation on top of the WELLBY engine.
//!
//! Responsibilities:
//!
//! - evaluate each programme's cost, WELLBYs and cost per WELLBY
//! - total the programmes into an overall comparison
//! - derive the marginal cost per session from branch staffing costs

pub mod costs;
pub mod evaluate;

pub use costs::*;
pub use evaluate::*;
