//! The complete result of one audit run.

use crate::metrics::{DisparityReport, GroupDistribution, GroupMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row counts through the inclusion filter.
///
/// Each dropped row is attributed to the first predicate it failed, in the
/// order the fields are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterStats {
    pub rows_read: u64,
    pub rows_kept: u64,
    pub dropped_screening_window: u64,
    pub dropped_unknown_recidivism: u64,
    pub dropped_excluded_charge: u64,
    pub dropped_missing_score_text: u64,
}

impl FilterStats {
    pub fn rows_dropped(&self) -> u64 {
        self.dropped_screening_window
            + self.dropped_unknown_recidivism
            + self.dropped_excluded_charge
            + self.dropped_missing_score_text
    }
}

/// The policy values an audit actually ran with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEcho {
    pub high_risk_threshold: u8,
    pub screening_window_days: i64,
    pub disparate_impact_threshold: f64,
    pub error_rate_parity_band: (f64, f64),
    pub group_column: String,
}

/// Everything computed by one audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub generator_version: String,
    /// Input path as given on the command line.
    pub input: String,
    pub filter: FilterStats,
    pub policy: PolicyEcho,
    /// One entry per requested group, in request order.
    pub metrics: Vec<GroupMetrics>,
    pub disparity: DisparityReport,
    /// One entry per requested group, in request order.
    pub distributions: Vec<GroupDistribution>,
}

impl AuditSummary {
    /// Look up a group's metrics by name.
    pub fn metrics_for(&self, group: &str) -> Option<&GroupMetrics> {
        self.metrics.iter().find(|m| m.group == group)
    }

    /// One-line status for quick checks.
    pub fn one_line(&self) -> String {
        let di = match self.disparity.disparate_impact.value.value() {
            Some(v) => format!("{:.3}", v),
            None => "N/A".to_string(),
        };
        format!(
            "{} rows kept of {}; disparate impact {} vs {} = {} ({})",
            self.filter.rows_kept,
            self.filter.rows_read,
            self.disparity.protected_group,
            self.disparity.reference_group,
            di,
            self.disparity.disparate_impact.verdict
        )
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
