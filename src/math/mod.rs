//! Mathematical utilities: monotone cubic interpolation and series closed forms.

pub mod pchip;
pub mod series;

pub use pchip::*;
pub use series::*;
