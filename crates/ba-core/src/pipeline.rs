//! End-to-end audit: load → filter → label → metrics → disparity.

use std::path::Path;

use ba_common::{AuditSummary, Error, PolicyEcho, Result, SCHEMA_VERSION};
use ba_config::AuditPolicy;
use chrono::Utc;
use tracing::info;

use crate::dataset::{load_records, AuditRecord, RecordFilter};
use crate::disparity::analyze_disparity;
use crate::label::{label_records, RiskThreshold};
use crate::logging::{event_names, Stage};
use crate::metrics::{compute_group_metrics, score_distributions};

/// Run a full audit over the CSV at `input`.
pub fn run_audit(input: &Path, policy: &AuditPolicy) -> Result<AuditSummary> {
    let records = load_records(input, policy)?;
    info!(
        event = event_names::LOAD_FINISHED,
        stage = %Stage::Load,
        path = %input.display(),
        rows = records.len(),
        "dataset loaded"
    );
    audit_records(records, policy, &input.display().to_string())
}

/// Run the audit over already-parsed records.
///
/// `input` is only echoed into the summary.
pub fn audit_records(
    records: Vec<AuditRecord>,
    policy: &AuditPolicy,
    input: &str,
) -> Result<AuditSummary> {
    let threshold = RiskThreshold::new(policy.high_risk_threshold).ok_or_else(|| {
        Error::PolicyValidation(format!(
            "high_risk_threshold must be in [1, 10], got {}",
            policy.high_risk_threshold
        ))
    })?;

    let (kept, filter) = RecordFilter::from_policy(&policy.filter).apply(records);
    info!(
        event = event_names::FILTER_FINISHED,
        stage = %Stage::Filter,
        rows_read = filter.rows_read,
        rows_kept = filter.rows_kept,
        dropped = filter.rows_dropped(),
        "inclusion filter applied"
    );

    let labeled = label_records(&kept, threshold, &policy.columns.decile_score)?;
    let metrics = compute_group_metrics(&labeled, &policy.groups);
    let distributions = score_distributions(&labeled, &policy.groups);

    let lookup = |group: &str| {
        metrics
            .iter()
            .find(|m| m.group == group)
            .ok_or_else(|| Error::UnknownGroup {
                group: group.to_string(),
            })
    };
    let protected = lookup(&policy.comparison.protected)?;
    let reference = lookup(&policy.comparison.reference)?;
    let disparity = analyze_disparity(protected, reference, &policy.thresholds);
    info!(
        event = event_names::DISPARITY_FINISHED,
        stage = %Stage::Disparity,
        protected = %disparity.protected_group,
        reference = %disparity.reference_group,
        disparate_impact = ?disparity.disparate_impact.value.value(),
        verdict = %disparity.disparate_impact.verdict,
        "disparity analysis complete"
    );

    Ok(AuditSummary {
        schema_version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now(),
        generator_version: env!("CARGO_PKG_VERSION").to_string(),
        input: input.to_string(),
        filter,
        policy: PolicyEcho {
            high_risk_threshold: threshold.value(),
            screening_window_days: policy.filter.screening_window_days,
            disparate_impact_threshold: policy.thresholds.disparate_impact,
            error_rate_parity_band: policy.thresholds.error_rate_parity_band,
            group_column: policy.columns.group.clone(),
        },
        metrics,
        disparity,
        distributions,
    })
}
