//! Count-backed rates.
//!
//! A [`Rate`] keeps the numerator and denominator counts it was built from.
//! When the denominator is zero the rate evaluates to `0.0`, and
//! [`Rate::is_defined`] reports `false` so that the sentinel can be told apart
//! from a genuine zero rate.

use serde::{Deserialize, Serialize};

/// A proportion `numerator / denominator` backed by its raw counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rate {
    pub numerator: u64,
    pub denominator: u64,
}

impl Rate {
    /// Rate of `part` within `part + rest`.
    ///
    /// Confusion-matrix rates are all of this shape (e.g. `fp / (fp + tn)`).
    pub fn of_parts(part: u64, rest: u64) -> Self {
        Self {
            numerator: part,
            denominator: part.saturating_add(rest),
        }
    }

    /// The rate as a float; `0.0` when the denominator is zero.
    pub fn value(&self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }

    /// `true` when the denominator is non-zero.
    pub fn is_defined(&self) -> bool {
        self.denominator > 0
    }

    /// The rate as a percentage in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        100.0 * self.value()
    }

}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.3} ({}/{})",
            self.value(),
            self.numerator,
            self.denominator
        )
    }
}
