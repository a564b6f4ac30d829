//! Core math modules.

pub mod rate;
pub mod ratio;
pub mod share;
