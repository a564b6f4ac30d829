//! Per-group fairness metrics and cross-group disparity types.

use ba_math::{DivisionUndefined, Rate};
use serde::{Deserialize, Serialize};

/// Lowest decile score produced by the scoring system.
pub const DECILE_MIN: u8 = 1;
/// Highest decile score produced by the scoring system.
pub const DECILE_MAX: u8 = 10;

/// Counts of predicted label against actual outcome for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Predicted high risk, reoffended.
    pub tp: u64,
    /// Predicted high risk, did not reoffend.
    pub fp: u64,
    /// Predicted low risk, did not reoffend.
    pub tn: u64,
    /// Predicted low risk, reoffended.
    #[serde(rename = "fn")]
    pub fn_: u64,
}

impl ConfusionMatrix {
    /// Tally one (prediction, outcome) pair.
    pub fn record(&mut self, predicted_high_risk: bool, reoffended: bool) {
        match (predicted_high_risk, reoffended) {
            (true, true) => self.tp += 1,
            (true, false) => self.fp += 1,
            (false, false) => self.tn += 1,
            (false, true) => self.fn_ += 1,
        }
    }

    /// Total number of tallied records.
    pub fn total(&self) -> u64 {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Records predicted high risk.
    pub fn predicted_positive(&self) -> u64 {
        self.tp + self.fp
    }

    pub fn false_positive_rate(&self) -> Rate {
        Rate::of_parts(self.fp, self.tn)
    }

    pub fn false_negative_rate(&self) -> Rate {
        Rate::of_parts(self.fn_, self.tp)
    }

    pub fn positive_predictive_value(&self) -> Rate {
        Rate::of_parts(self.tp, self.fp)
    }

    pub fn negative_predictive_value(&self) -> Rate {
        Rate::of_parts(self.tn, self.fn_)
    }

    /// Fraction of the group labeled high risk.
    pub fn selection_rate(&self) -> Rate {
        Rate::of_parts(self.predicted_positive(), self.tn + self.fn_)
    }
}

/// Fairness metrics for one demographic group.
///
/// Built once from a confusion matrix and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub group: String,
    pub sample_size: u64,
    pub confusion: ConfusionMatrix,
    pub false_positive_rate: Rate,
    pub false_negative_rate: Rate,
    pub positive_predictive_value: Rate,
    pub negative_predictive_value: Rate,
    pub selection_rate: Rate,
}

impl GroupMetrics {
    /// Derive all rates from a tallied confusion matrix.
    pub fn from_confusion(group: impl Into<String>, confusion: ConfusionMatrix) -> Self {
        Self {
            group: group.into(),
            sample_size: confusion.total(),
            confusion,
            false_positive_rate: confusion.false_positive_rate(),
            false_negative_rate: confusion.false_negative_rate(),
            positive_predictive_value: confusion.positive_predictive_value(),
            negative_predictive_value: confusion.negative_predictive_value(),
            selection_rate: confusion.selection_rate(),
        }
    }

    /// `true` when the group had no records at all.
    pub fn is_empty(&self) -> bool {
        self.sample_size == 0
    }

    /// All five rates in display order, with their labels.
    pub fn rates(&self) -> [(&'static str, Rate); 5] {
        [
            ("False Positive Rate", self.false_positive_rate),
            ("False Negative Rate", self.false_negative_rate),
            ("Positive Predictive Value", self.positive_predictive_value),
            ("Negative Predictive Value", self.negative_predictive_value),
            ("Selection Rate", self.selection_rate),
        ]
    }
}

/// Decile histogram and outcome split for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDistribution {
    pub group: String,
    /// `score_counts[i]` counts records with decile score `i + 1`.
    pub score_counts: [u64; 10],
    pub recidivated: u64,
    pub not_recidivated: u64,
}

impl GroupDistribution {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            score_counts: [0; 10],
            recidivated: 0,
            not_recidivated: 0,
        }
    }

    /// Tally one record. Scores outside 1..=10 are ignored.
    pub fn record(&mut self, decile_score: u8, reoffended: bool) {
        if (DECILE_MIN..=DECILE_MAX).contains(&decile_score) {
            self.score_counts[usize::from(decile_score - DECILE_MIN)] += 1;
        }
        if reoffended {
            self.recidivated += 1;
        } else {
            self.not_recidivated += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.recidivated + self.not_recidivated
    }
}

/// A cross-group ratio, or the reason it could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RatioValue {
    Defined { value: f64 },
    Undefined { reason: String },
}

impl RatioValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            RatioValue::Defined { value } => Some(*value),
            RatioValue::Undefined { .. } => None,
        }
    }
}

impl From<Result<f64, DivisionUndefined>> for RatioValue {
    fn from(result: Result<f64, DivisionUndefined>) -> Self {
        match result {
            Ok(value) => RatioValue::Defined { value },
            Err(err) => RatioValue::Undefined {
                reason: err.to_string(),
            },
        }
    }
}

/// Outcome of comparing a ratio against its fairness threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Undefined,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
            Verdict::Undefined => write!(f, "N/A"),
        }
    }
}

/// Acceptance region for a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Threshold {
    /// Pass when `value >= min`.
    AtLeast { min: f64 },
    /// Pass when `low <= value <= high`.
    Within { low: f64, high: f64 },
}

impl Threshold {
    pub fn accepts(&self, value: f64) -> bool {
        match *self {
            Threshold::AtLeast { min } => value >= min,
            Threshold::Within { low, high } => (low..=high).contains(&value),
        }
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Threshold::AtLeast { min } => write!(f, ">= {}", min),
            Threshold::Within { low, high } => write!(f, "within [{}, {}]", low, high),
        }
    }
}

/// A ratio paired with its threshold and verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioCheck {
    pub value: RatioValue,
    pub threshold: Threshold,
    pub verdict: Verdict,
}

impl RatioCheck {
    pub fn evaluate(value: RatioValue, threshold: Threshold) -> Self {
        let verdict = match value.value() {
            Some(v) if threshold.accepts(v) => Verdict::Pass,
            Some(_) => Verdict::Fail,
            None => Verdict::Undefined,
        };
        Self {
            value,
            threshold,
            verdict,
        }
    }
}

/// Disparity between a protected group and a reference group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisparityReport {
    pub protected_group: String,
    pub reference_group: String,
    /// Protected selection rate over reference selection rate.
    pub disparate_impact: RatioCheck,
    /// Protected FPR over reference FPR.
    pub fpr_ratio: RatioCheck,
    /// Reference FNR over protected FNR.
    pub fnr_ratio: RatioCheck,
}

impl DisparityReport {
    /// The three checks with display labels.
    pub fn checks(&self) -> [(&'static str, &RatioCheck); 3] {
        [
            ("Disparate Impact Ratio", &self.disparate_impact),
            ("False Positive Rate Ratio", &self.fpr_ratio),
            ("False Negative Rate Ratio", &self.fnr_ratio),
        ]
    }

    /// `true` if any check came out as FAIL.
    pub fn any_failed(&self) -> bool {
        self.checks()
            .iter()
            .any(|(_, check)| check.verdict == Verdict::Fail)
    }
}
