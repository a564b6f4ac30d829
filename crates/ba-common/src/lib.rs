//! Bias Audit common types and errors.
//!
//! This crate provides foundational types shared across the audit crates:
//! - Confusion matrices and per-group metrics
//! - Disparity reports with verdicts
//! - Score and outcome distributions for charts
//! - The unified error type
//! - Output format specifications

pub mod error;
pub mod metrics;
pub mod output;
pub mod summary;

pub use error::{Error, Result};
pub use metrics::{
    ConfusionMatrix, DisparityReport, GroupDistribution, GroupMetrics, RatioCheck, RatioValue,
    Threshold, Verdict, DECILE_MAX, DECILE_MIN,
};
pub use output::OutputFormat;
pub use summary::{AuditSummary, FilterStats, PolicyEcho};

/// Schema version for JSON output.
pub const SCHEMA_VERSION: &str = "1.0.0";
