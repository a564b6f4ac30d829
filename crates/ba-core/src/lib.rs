//! Bias Audit core library.
//!
//! Loads a COMPAS-style CSV, applies the inclusion filter, labels each
//! subject from the decile score, computes per-group fairness metrics and the
//! protected-versus-reference disparity ratios, and hands the resulting
//! [`ba_common::AuditSummary`] to the report renderers.

pub mod dataset;
pub mod disparity;
pub mod exit_codes;
pub mod label;
pub mod logging;
pub mod metrics;
pub mod pipeline;

pub use dataset::{load_records, AuditRecord, DataLoadError, RecordFilter};
pub use disparity::analyze_disparity;
pub use exit_codes::ExitCode;
pub use label::{label_records, LabeledRecord, RiskThreshold};
pub use metrics::{compute_group_metrics, score_distributions};
pub use pipeline::run_audit;
