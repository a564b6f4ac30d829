//! Audit policy types.
//!
//! Every field has a default, so a policy file only needs the keys it changes.
//! The defaults reproduce the standard COMPAS two-year audit.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// Complete audit policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPolicy {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Decile score at or above which a subject is labeled high risk.
    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: u8,

    #[serde(default)]
    pub filter: FilterPolicy,

    #[serde(default)]
    pub columns: ColumnMap,

    /// Groups to compute metrics for, in report order.
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,

    #[serde(default)]
    pub comparison: Comparison,

    #[serde(default)]
    pub thresholds: FairnessThresholds,

    #[serde(default)]
    pub report: ReportPolicy,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_high_risk_threshold() -> u8 {
    5
}

fn default_groups() -> Vec<String> {
    vec!["African-American".to_string(), "Caucasian".to_string()]
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            description: None,
            high_risk_threshold: default_high_risk_threshold(),
            filter: FilterPolicy::default(),
            columns: ColumnMap::default(),
            groups: default_groups(),
            comparison: Comparison::default(),
            thresholds: FairnessThresholds::default(),
            report: ReportPolicy::default(),
        }
    }
}

/// Row inclusion predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPolicy {
    /// Keep rows with `|days_b_screening_arrest| <= screening_window_days`.
    #[serde(default = "default_screening_window_days")]
    pub screening_window_days: i64,

    /// `is_recid` value meaning "outcome not recorded".
    #[serde(default = "default_unknown_recid_sentinel")]
    pub unknown_recid_sentinel: i64,

    /// Charge degree codes to drop (`O` is an ordinance violation).
    #[serde(default = "default_excluded_charge_degrees")]
    pub excluded_charge_degrees: Vec<String>,

    /// Score text values treated as missing, in addition to the empty string.
    #[serde(default = "default_missing_score_text_markers")]
    pub missing_score_text_markers: Vec<String>,
}

fn default_screening_window_days() -> i64 {
    30
}

fn default_unknown_recid_sentinel() -> i64 {
    -1
}

fn default_excluded_charge_degrees() -> Vec<String> {
    vec!["O".to_string()]
}

fn default_missing_score_text_markers() -> Vec<String> {
    vec!["N/A".to_string(), "NA".to_string(), "NaN".to_string()]
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            screening_window_days: default_screening_window_days(),
            unknown_recid_sentinel: default_unknown_recid_sentinel(),
            excluded_charge_degrees: default_excluded_charge_degrees(),
            missing_score_text_markers: default_missing_score_text_markers(),
        }
    }
}

/// Input column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub group: String,
    pub decile_score: String,
    pub two_year_recid: String,
    pub is_recid: String,
    pub days_b_screening_arrest: String,
    pub c_charge_degree: String,
    pub score_text: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            group: "race".to_string(),
            decile_score: "decile_score".to_string(),
            two_year_recid: "two_year_recid".to_string(),
            is_recid: "is_recid".to_string(),
            days_b_screening_arrest: "days_b_screening_arrest".to_string(),
            c_charge_degree: "c_charge_degree".to_string(),
            score_text: "score_text".to_string(),
        }
    }
}

impl ColumnMap {
    /// All required column names, in a stable order.
    pub fn required(&self) -> [&str; 7] {
        [
            self.group.as_str(),
            self.decile_score.as_str(),
            self.two_year_recid.as_str(),
            self.is_recid.as_str(),
            self.days_b_screening_arrest.as_str(),
            self.c_charge_degree.as_str(),
            self.score_text.as_str(),
        ]
    }
}

/// The pair of groups the disparity analysis compares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comparison {
    /// Group whose rates form the numerator of the disparate-impact ratio.
    pub protected: String,
    /// Group the protected group is measured against.
    pub reference: String,
}

impl Default for Comparison {
    fn default() -> Self {
        Self {
            protected: "African-American".to_string(),
            reference: "Caucasian".to_string(),
        }
    }
}

/// Pass/fail thresholds for the disparity checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessThresholds {
    /// Minimum selection-rate ratio (the four-fifths rule).
    #[serde(default = "default_disparate_impact")]
    pub disparate_impact: f64,

    /// Inclusive band an error-rate ratio must fall in to pass.
    #[serde(default = "default_error_rate_parity_band")]
    pub error_rate_parity_band: (f64, f64),
}

fn default_disparate_impact() -> f64 {
    0.8
}

fn default_error_rate_parity_band() -> (f64, f64) {
    (0.8, 1.25)
}

impl Default for FairnessThresholds {
    fn default() -> Self {
        Self {
            disparate_impact: default_disparate_impact(),
            error_rate_parity_band: default_error_rate_parity_band(),
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPolicy {
    #[serde(default = "default_title")]
    pub title: String,

    /// Horizontal guide drawn on the error-rate chart.
    #[serde(default = "default_error_rate_guide")]
    pub error_rate_guide: f64,
}

fn default_title() -> String {
    "COMPAS Bias Audit Report".to_string()
}

fn default_error_rate_guide() -> f64 {
    0.3
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            title: default_title(),
            error_rate_guide: default_error_rate_guide(),
        }
    }
}

impl AuditPolicy {
    /// Load a policy from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse a policy from a JSON string.
    pub fn parse_json(content: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(content).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Override the high-risk threshold.
    pub fn with_high_risk_threshold(mut self, threshold: u8) -> Self {
        self.high_risk_threshold = threshold;
        self
    }

    /// Override the audited groups.
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Override the protected group.
    pub fn with_protected(mut self, group: impl Into<String>) -> Self {
        self.comparison.protected = group.into();
        self
    }

    /// Override the reference group.
    pub fn with_reference(mut self, group: impl Into<String>) -> Self {
        self.comparison.reference = group.into();
        self
    }
}
