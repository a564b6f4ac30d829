//! Bias Audit math utilities.

pub mod math;

pub use math::rate::*;
pub use math::ratio::*;
pub use math::share;
