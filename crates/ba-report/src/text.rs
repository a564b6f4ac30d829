//! Plain-text and Markdown audit reports.
//!
//! Both renderers are pure functions of the summary and config. The
//! generation timestamp is deliberately left out so that repeated runs over
//! the same input produce byte-identical output.

use ba_common::{AuditSummary, GroupMetrics, RatioCheck, RatioValue, Verdict};
use ba_math::Rate;

use crate::charts::rule_percent;

const RULE_WIDTH: usize = 70;

const METRIC_HEADERS: [&str; 7] = [
    "Group",
    "Sample Size",
    "False Positive Rate",
    "False Negative Rate",
    "Positive Predictive Value",
    "Negative Predictive Value",
    "Selection Rate",
];

const SENTINEL_FOOTNOTE: &str = "* rate has a zero denominator and is reported as 0.000000";

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn fmt_rate(rate: &Rate) -> String {
    if rate.is_defined() {
        format!("{:.6}", rate.value())
    } else {
        format!("{:.6}*", rate.value())
    }
}

fn fmt_ratio(value: &RatioValue) -> String {
    match value {
        RatioValue::Defined { value } => format!("{:.3}", value),
        RatioValue::Undefined { reason } => format!("N/A ({})", reason),
    }
}

fn fmt_percent(rate: &Rate) -> String {
    if rate.is_defined() {
        format!("{:.1}%", rate.percent())
    } else {
        "N/A".to_string()
    }
}

fn metric_row(m: &GroupMetrics) -> [String; 7] {
    [
        m.group.clone(),
        m.sample_size.to_string(),
        fmt_rate(&m.false_positive_rate),
        fmt_rate(&m.false_negative_rate),
        fmt_rate(&m.positive_predictive_value),
        fmt_rate(&m.negative_predictive_value),
        fmt_rate(&m.selection_rate),
    ]
}

fn has_sentinel(metrics: &[GroupMetrics]) -> bool {
    metrics
        .iter()
        .any(|m| m.rates().iter().any(|(_, r)| !r.is_defined()))
}

fn verdict_note(check: &RatioCheck, label: &str) -> String {
    format!("  ({} threshold: {}, Current: {})", label, check.threshold, check.verdict)
}

/// Render the fixed-width text report.
pub fn render_text(summary: &AuditSummary, config: &crate::ReportConfig) -> String {
    let mut out = String::new();
    let filter = &summary.filter;
    let policy = &summary.policy;

    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str(&format!("{}\n", config.title.to_uppercase()));
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str(&format!("Input: {}\n", summary.input));
    out.push_str(&format!(
        "Rows read: {}, kept: {}, dropped: {}\n",
        filter.rows_read,
        filter.rows_kept,
        filter.rows_dropped()
    ));
    out.push_str(&format!(
        "  outside screening window (|days| > {}): {}\n",
        policy.screening_window_days, filter.dropped_screening_window
    ));
    out.push_str(&format!(
        "  unknown recidivism: {}\n",
        filter.dropped_unknown_recidivism
    ));
    out.push_str(&format!(
        "  excluded charge degree: {}\n",
        filter.dropped_excluded_charge
    ));
    out.push_str(&format!(
        "  missing score text: {}\n",
        filter.dropped_missing_score_text
    ));
    out.push_str(&format!(
        "High risk: decile score >= {}\n",
        policy.high_risk_threshold
    ));

    out.push('\n');
    out.push_str(&format!(
        "FAIRNESS METRICS BY {}:\n",
        policy.group_column.to_uppercase()
    ));

    let rows: Vec<[String; 7]> = summary.metrics.iter().map(metric_row).collect();
    let mut widths: Vec<usize> = METRIC_HEADERS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    let header: Vec<String> = METRIC_HEADERS
        .iter()
        .zip(&widths)
        .enumerate()
        .map(|(i, (h, w))| {
            if i == 0 {
                format!("{:<w$}", h, w = w)
            } else {
                format!("{:>w$}", h, w = w)
            }
        })
        .collect();
    out.push_str(&format!("{}\n", header.join("  ").trim_end()));
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (c, w))| {
                if i == 0 {
                    format!("{:<w$}", c, w = w)
                } else {
                    format!("{:>w$}", c, w = w)
                }
            })
            .collect();
        out.push_str(&format!("{}\n", cells.join("  ").trim_end()));
    }
    if has_sentinel(&summary.metrics) {
        out.push_str(&format!("{}\n", SENTINEL_FOOTNOTE));
    }

    let d = &summary.disparity;
    let impact_rule = format!("{}% rule", rule_percent(policy.disparate_impact_threshold));
    let protected = summary.metrics_for(&d.protected_group);
    let reference = summary.metrics_for(&d.reference_group);

    out.push('\n');
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str("DISPARITY ANALYSIS:\n");
    out.push_str(&format!("{}\n", heavy_rule()));
    out.push_str(&format!(
        "Disparate Impact Ratio ({}/{}): {}\n",
        d.protected_group,
        d.reference_group,
        fmt_ratio(&d.disparate_impact.value)
    ));
    out.push_str(&format!("{}\n", verdict_note(&d.disparate_impact, &impact_rule)));

    out.push('\n');
    out.push_str(&format!(
        "False Positive Rate Ratio ({}/{}): {}\n",
        d.protected_group,
        d.reference_group,
        fmt_ratio(&d.fpr_ratio.value)
    ));
    for m in [protected, reference].into_iter().flatten() {
        out.push_str(&format!("  {} FPR: {}\n", m.group, fmt_percent(&m.false_positive_rate)));
    }
    out.push_str(&format!("{}\n", verdict_note(&d.fpr_ratio, "parity band")));

    out.push('\n');
    out.push_str(&format!(
        "False Negative Rate Ratio ({}/{}): {}\n",
        d.reference_group,
        d.protected_group,
        fmt_ratio(&d.fnr_ratio.value)
    ));
    for m in [protected, reference].into_iter().flatten() {
        out.push_str(&format!("  {} FNR: {}\n", m.group, fmt_percent(&m.false_negative_rate)));
    }
    out.push_str(&format!("{}\n", verdict_note(&d.fnr_ratio, "parity band")));

    out.push('\n');
    out.push_str(&format!("{}\n", light_rule()));
    let failed = d
        .checks()
        .iter()
        .filter(|(_, c)| c.verdict == Verdict::Fail)
        .count();
    let undefined = d
        .checks()
        .iter()
        .filter(|(_, c)| c.verdict == Verdict::Undefined)
        .count();
    out.push_str(&format!(
        "Checks failed: {} of 3 ({} not computable)\n",
        failed, undefined
    ));

    out
}

/// Render the report as Markdown.
pub fn render_markdown(summary: &AuditSummary, config: &crate::ReportConfig) -> String {
    let mut out = String::new();
    let filter = &summary.filter;
    let policy = &summary.policy;

    out.push_str(&format!("# {}\n", config.title));
    out.push('\n');
    out.push_str(&format!("- Input: `{}`\n", summary.input));
    out.push_str(&format!(
        "- Rows: {} read, {} kept, {} dropped\n",
        filter.rows_read,
        filter.rows_kept,
        filter.rows_dropped()
    ));
    out.push_str(&format!(
        "- High risk: decile score >= {}\n",
        policy.high_risk_threshold
    ));
    out.push('\n');

    out.push_str(&format!("## Fairness metrics by {}\n", policy.group_column));
    out.push('\n');
    out.push_str(&format!("| {} |\n", METRIC_HEADERS.join(" | ")));
    out.push_str(&format!("|---|{}\n", "---:|".repeat(METRIC_HEADERS.len() - 1)));
    for m in &summary.metrics {
        out.push_str(&format!("| {} |\n", metric_row(m).join(" | ")));
    }
    if has_sentinel(&summary.metrics) {
        out.push('\n');
        out.push_str(&format!("\\{}\n", SENTINEL_FOOTNOTE));
    }
    out.push('\n');

    let d = &summary.disparity;
    out.push_str(&format!(
        "## Disparity: {} vs {}\n",
        d.protected_group, d.reference_group
    ));
    out.push('\n');
    out.push_str("| Check | Value | Threshold | Verdict |\n");
    out.push_str("|---|---:|---|---|\n");
    for (label, check) in d.checks() {
        out.push_str(&format!(
            "| {} | {} | {} | **{}** |\n",
            label,
            fmt_ratio(&check.value),
            check.threshold,
            check.verdict
        ));
    }

    out
}
