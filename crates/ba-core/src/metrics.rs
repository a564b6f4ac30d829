//! Per-group metric computation.
//!
//! Records are partitioned by group, each partition is reduced to a confusion
//! matrix (and a score histogram), and results come back in the order the
//! groups were requested. A requested group with no rows yields all-sentinel
//! metrics rather than an error.

use std::collections::HashMap;

use ba_common::{ConfusionMatrix, GroupDistribution, GroupMetrics};
use tracing::{debug, warn};

use crate::label::LabeledRecord;
use crate::logging::{event_names, Stage};

/// Compute fairness metrics for each requested group.
pub fn compute_group_metrics(records: &[LabeledRecord], groups: &[String]) -> Vec<GroupMetrics> {
    let mut matrices: HashMap<&str, ConfusionMatrix> =
        groups.iter().map(|g| (g.as_str(), ConfusionMatrix::default())).collect();

    for record in records {
        if let Some(cm) = matrices.get_mut(record.group.as_str()) {
            cm.record(record.predicted_high_risk, record.reoffended);
        }
    }

    groups
        .iter()
        .map(|group| {
            let cm = matrices.get(group.as_str()).copied().unwrap_or_default();
            let metrics = GroupMetrics::from_confusion(group.clone(), cm);
            if metrics.is_empty() {
                warn!(group = %group, "group has no records after filtering");
            } else {
                debug!(
                    event = event_names::METRICS_GROUP_DONE,
                    stage = %Stage::Metrics,
                    group = %group,
                    n = metrics.sample_size,
                    fpr = metrics.false_positive_rate.value(),
                    fnr = metrics.false_negative_rate.value(),
                    selection_rate = metrics.selection_rate.value(),
                    "group metrics computed"
                );
            }
            metrics
        })
        .collect()
}

/// Decile histograms and outcome counts for each requested group.
pub fn score_distributions(records: &[LabeledRecord], groups: &[String]) -> Vec<GroupDistribution> {
    let mut by_group: HashMap<&str, GroupDistribution> = groups
        .iter()
        .map(|g| (g.as_str(), GroupDistribution::new(g.clone())))
        .collect();

    for record in records {
        if let Some(dist) = by_group.get_mut(record.group.as_str()) {
            dist.record(record.decile_score, record.reoffended);
        }
    }

    groups
        .iter()
        .map(|g| {
            by_group
                .remove(g.as_str())
                .unwrap_or_else(|| GroupDistribution::new(g.clone()))
        })
        .collect()
}
