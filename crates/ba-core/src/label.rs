//! Risk labeling.
//!
//! A subject is predicted high risk when their decile score is at or above the
//! threshold. The score range is checked here, on rows that survived the
//! filter, so out-of-range scores on discarded rows do not abort the audit.

use ba_common::{DECILE_MAX, DECILE_MIN};
use serde::{Deserialize, Serialize};

use crate::dataset::{AuditRecord, DataLoadError};

/// Decile score at or above which a subject is labeled high risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThreshold(u8);

impl RiskThreshold {
    /// Returns `None` outside `1..=10`.
    pub fn new(score: u8) -> Option<Self> {
        (DECILE_MIN..=DECILE_MAX)
            .contains(&score)
            .then_some(Self(score))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_high_risk(&self, decile_score: u8) -> bool {
        decile_score >= self.0
    }
}

impl Default for RiskThreshold {
    fn default() -> Self {
        Self(5)
    }
}

/// A filtered record reduced to what the metrics need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub group: String,
    pub decile_score: u8,
    pub predicted_high_risk: bool,
    pub reoffended: bool,
}

/// Label every record, rejecting decile scores outside `1..=10`.
pub fn label_records(
    records: &[AuditRecord],
    threshold: RiskThreshold,
    score_column: &str,
) -> Result<Vec<LabeledRecord>, DataLoadError> {
    records
        .iter()
        .map(|r| {
            let score = u8::try_from(r.decile_score)
                .ok()
                .filter(|s| (DECILE_MIN..=DECILE_MAX).contains(s))
                .ok_or_else(|| DataLoadError::MalformedRow {
                    line: r.line,
                    column: score_column.to_string(),
                    value: r.decile_score.to_string(),
                    reason: format!("decile score must be in {}..={}", DECILE_MIN, DECILE_MAX),
                })?;
            Ok(LabeledRecord {
                group: r.group.clone(),
                decile_score: score,
                predicted_high_risk: threshold.is_high_risk(score),
                reoffended: r.two_year_recid,
            })
        })
        .collect()
}
