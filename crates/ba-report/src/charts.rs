//! Chart data for the four audit panels.
//!
//! Everything here is plain data computed from an [`AuditSummary`]. Drawing
//! happens in [`crate::svg`], so panel contents can be asserted on directly.

use ba_common::{AuditSummary, GroupDistribution, GroupMetrics, DECILE_MAX, DECILE_MIN};
use ba_math::share::{max_or_zero, percentages};
use serde::{Deserialize, Serialize};

use crate::ReportConfig;

/// Error-rate bar colors (FPR, FNR).
const ERROR_RATE_COLORS: [&str; 2] = ["#e74c3c", "#3498db"];
/// Per-group selection-rate bar colors.
const SELECTION_COLORS: [&str; 6] = [
    "#9b59b6", "#2ecc71", "#f1c40f", "#34495e", "#95a5a6", "#d35400",
];
/// Per-group decile distribution colors.
const DISTRIBUTION_COLORS: [&str; 6] = [
    "#e67e22", "#1abc9c", "#8e44ad", "#2c3e50", "#7f8c8d", "#16a085",
];
/// Outcome stack colors (recidivated, did not recidivate).
const OUTCOME_COLORS: [&str; 2] = ["#c0392b", "#27ae60"];

const ERROR_GUIDE_COLOR: &str = "red";
const FOUR_FIFTHS_COLOR: &str = "orange";

/// How a panel's series are laid out along each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    /// Series side by side within each category.
    Grouped,
    /// Series stacked on top of each other within each category.
    Stacked,
}

/// One data series: a value per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    /// Bar `i` is filled with `colors[i % colors.len()]`.
    pub colors: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    fn new(label: impl Into<String>, colors: &[&str], values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            values,
        }
    }

    /// Fill color of the bar at `index`.
    pub fn color_at(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            "#888888"
        } else {
            &self.colors[index % self.colors.len()]
        }
    }
}

/// Dashed horizontal guide line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
    pub color: String,
}

/// One chart panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub kind: PanelKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub reference_line: Option<ReferenceLine>,
    /// Top of the y axis.
    pub y_max: f64,
}

impl Panel {
    /// Highest point any bar or guide reaches.
    pub fn data_max(&self) -> f64 {
        let bars = match self.kind {
            PanelKind::Grouped => self
                .series
                .iter()
                .map(|s| max_or_zero(&s.values))
                .fold(0.0, f64::max),
            PanelKind::Stacked => {
                let sums: Vec<f64> = (0..self.categories.len())
                    .map(|i| {
                        self.series
                            .iter()
                            .map(|s| s.values.get(i).copied().unwrap_or(0.0))
                            .sum()
                    })
                    .collect();
                max_or_zero(&sums)
            }
        };
        let guide = self.reference_line.as_ref().map_or(0.0, |r| r.value);
        bars.max(guide)
    }
}

/// The full four-panel chart set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub title: String,
    /// Size of one panel in SVG pixels.
    pub panel_width: u32,
    pub panel_height: u32,
    /// Panels in reading order: top-left, top-right, bottom-left, bottom-right.
    pub panels: Vec<Panel>,
}

/// Round `value` up to 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_ceiling(value: f64) -> f64 {
    if !(value.is_finite() && value > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    for step in [1.0, 2.0, 2.5, 5.0, 10.0] {
        let candidate = step * magnitude;
        if candidate >= value - f64::EPSILON * magnitude {
            return candidate;
        }
    }
    10.0 * magnitude
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn finish(mut panel: Panel) -> Panel {
    panel.y_max = nice_ceiling(panel.data_max() * 1.1);
    panel
}

fn error_rate_panel(metrics: &[GroupMetrics], by: &str, guide: f64) -> Panel {
    finish(Panel {
        kind: PanelKind::Grouped,
        title: format!("Error Rates by {}", by),
        x_label: String::new(),
        y_label: "Rate".to_string(),
        categories: metrics.iter().map(|m| m.group.clone()).collect(),
        series: vec![
            Series::new(
                "False Positive Rate",
                &ERROR_RATE_COLORS[..1],
                metrics.iter().map(|m| m.false_positive_rate.value()).collect(),
            ),
            Series::new(
                "False Negative Rate",
                &ERROR_RATE_COLORS[1..],
                metrics.iter().map(|m| m.false_negative_rate.value()).collect(),
            ),
        ],
        reference_line: Some(ReferenceLine {
            value: guide,
            label: format!("{:.0}% threshold", guide * 100.0),
            color: ERROR_GUIDE_COLOR.to_string(),
        }),
        y_max: 0.0,
    })
}

/// Disparate-impact threshold as a percentage, e.g. `0.8` gives `80`.
pub(crate) fn rule_percent(threshold: f64) -> f64 {
    (threshold * 1000.0).round() / 10.0
}

fn selection_panel(metrics: &[GroupMetrics], by: &str, threshold: f64) -> Panel {
    let values: Vec<f64> = metrics.iter().map(|m| m.selection_rate.value()).collect();
    let guide = threshold * max_or_zero(&values);
    finish(Panel {
        kind: PanelKind::Grouped,
        title: format!("Selection Rate (Predicted High Risk) by {}", by),
        x_label: String::new(),
        y_label: "Selection Rate".to_string(),
        categories: metrics.iter().map(|m| m.group.clone()).collect(),
        series: vec![Series::new("Selection Rate", &SELECTION_COLORS, values)],
        reference_line: Some(ReferenceLine {
            value: guide,
            label: format!("{}% Rule Threshold", rule_percent(threshold)),
            color: FOUR_FIFTHS_COLOR.to_string(),
        }),
        y_max: 0.0,
    })
}

fn distribution_panel(distributions: &[GroupDistribution], by: &str) -> Panel {
    let series = distributions
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let color = DISTRIBUTION_COLORS[i % DISTRIBUTION_COLORS.len()];
            Series::new(d.group.clone(), &[color], percentages(&d.score_counts))
        })
        .collect();
    finish(Panel {
        kind: PanelKind::Grouped,
        title: format!("Risk Score Distribution by {}", by),
        x_label: "Decile Score".to_string(),
        y_label: "Percentage (%)".to_string(),
        categories: (DECILE_MIN..=DECILE_MAX).map(|s| s.to_string()).collect(),
        series,
        reference_line: None,
        y_max: 0.0,
    })
}

fn outcome_panel(distributions: &[GroupDistribution], by: &str) -> Panel {
    let shares: Vec<Vec<f64>> = distributions
        .iter()
        .map(|d| percentages(&[d.recidivated, d.not_recidivated]))
        .collect();
    Panel {
        kind: PanelKind::Stacked,
        title: format!("Actual Recidivism Rates by {}", by),
        x_label: String::new(),
        y_label: "Percentage (%)".to_string(),
        categories: distributions.iter().map(|d| d.group.clone()).collect(),
        series: vec![
            Series::new(
                "Recidivated",
                &OUTCOME_COLORS[..1],
                shares.iter().map(|s| s[0]).collect(),
            ),
            Series::new(
                "Did Not Recidivate",
                &OUTCOME_COLORS[1..],
                shares.iter().map(|s| s[1]).collect(),
            ),
        ],
        reference_line: None,
        y_max: 100.0,
    }
}

/// Build the four chart panels for a summary.
pub fn build_charts(summary: &AuditSummary, config: &ReportConfig) -> ChartSet {
    let by = capitalize(&summary.policy.group_column);
    ChartSet {
        title: config.title.clone(),
        panel_width: config.panel_width,
        panel_height: config.panel_height,
        panels: vec![
            error_rate_panel(&summary.metrics, &by, config.error_rate_guide),
            selection_panel(
                &summary.metrics,
                &by,
                summary.policy.disparate_impact_threshold,
            ),
            distribution_panel(&summary.distributions, &by),
            outcome_panel(&summary.distributions, &by),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ba_common::{
        ConfusionMatrix, DisparityReport, FilterStats, PolicyEcho, RatioCheck, RatioValue,
        Threshold,
    };

    fn summary() -> AuditSummary {
        let a = GroupMetrics::from_confusion(
            "A",
            ConfusionMatrix {
                tp: 40,
                fp: 10,
                tn: 40,
                fn_: 10,
            },
        );
        let b = GroupMetrics::from_confusion(
            "B",
            ConfusionMatrix {
                tp: 10,
                fp: 10,
                tn: 70,
                fn_: 10,
            },
        );
        let mut da = GroupDistribution::new("A");
        for score in 1..=10u8 {
            da.record(score, score > 5);
        }
        let mut db = GroupDistribution::new("B");
        db.record(1, false);
        db.record(1, false);
        db.record(2, true);
        db.record(3, false);
        let check = RatioCheck::evaluate(
            RatioValue::Defined { value: 2.5 },
            Threshold::AtLeast { min: 0.8 },
        );
        AuditSummary {
            schema_version: ba_common::SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now(),
            generator_version: "test".to_string(),
            input: "in.csv".to_string(),
            filter: FilterStats::default(),
            policy: PolicyEcho {
                high_risk_threshold: 5,
                screening_window_days: 30,
                disparate_impact_threshold: 0.8,
                error_rate_parity_band: (0.8, 1.25),
                group_column: "race".to_string(),
            },
            metrics: vec![a, b],
            disparity: DisparityReport {
                protected_group: "A".to_string(),
                reference_group: "B".to_string(),
                disparate_impact: check.clone(),
                fpr_ratio: check.clone(),
                fnr_ratio: check,
            },
            distributions: vec![da, db],
        }
    }

    #[test]
    fn four_panels_in_order() {
        let charts = build_charts(&summary(), &ReportConfig::default());
        assert_eq!(charts.panels.len(), 4);
        assert_eq!(charts.panels[0].title, "Error Rates by Race");
        assert_eq!(
            charts.panels[1].title,
            "Selection Rate (Predicted High Risk) by Race"
        );
        assert_eq!(charts.panels[2].title, "Risk Score Distribution by Race");
        assert_eq!(charts.panels[3].title, "Actual Recidivism Rates by Race");
        assert_eq!(charts.panels[3].kind, PanelKind::Stacked);
    }

    #[test]
    fn error_rate_panel_values_and_guide() {
        let charts = build_charts(&summary(), &ReportConfig::default());
        let p = &charts.panels[0];
        assert_eq!(p.categories, vec!["A", "B"]);
        assert_eq!(p.series[0].values, vec![0.2, 0.125]);
        assert_eq!(p.series[1].values, vec![0.2, 0.5]);
        let guide = p.reference_line.as_ref().unwrap();
        assert_eq!(guide.value, 0.3);
        assert_eq!(guide.label, "30% threshold");
        assert!(p.y_max >= 0.5);
    }

    #[test]
    fn selection_guide_scales_max_rate() {
        let charts = build_charts(&summary(), &ReportConfig::default());
        let p = &charts.panels[1];
        assert_eq!(p.series[0].values, vec![0.5, 0.2]);
        assert_eq!(p.series[0].color_at(0), "#9b59b6");
        assert_eq!(p.series[0].color_at(1), "#2ecc71");
        let guide = p.reference_line.as_ref().unwrap();
        assert!((guide.value - 0.4).abs() < 1e-12);
        assert_eq!(guide.label, "80% Rule Threshold");
    }

    #[test]
    fn selection_guide_follows_policy_threshold() {
        let mut s = summary();
        s.policy.disparate_impact_threshold = 0.9;
        let charts = build_charts(&s, &ReportConfig::default());
        let guide = charts.panels[1].reference_line.as_ref().unwrap();
        assert!((guide.value - 0.45).abs() < 1e-12);
        assert_eq!(guide.label, "90% Rule Threshold");
    }

    #[test]
    fn rule_percent_keeps_fractions() {
        assert_eq!(rule_percent(0.8), 80.0);
        assert_eq!(rule_percent(0.825), 82.5);
    }

    #[test]
    fn distribution_is_percent_per_group() {
        let charts = build_charts(&summary(), &ReportConfig::default());
        let p = &charts.panels[2];
        assert_eq!(p.categories.len(), 10);
        assert_eq!(p.categories[0], "1");
        assert_eq!(p.series[0].values, vec![10.0; 10]);
        assert_eq!(p.series[1].values[0], 50.0);
        assert_eq!(p.series[1].values[1], 25.0);
        let total: f64 = p.series[1].values.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn outcome_stacks_sum_to_hundred() {
        let charts = build_charts(&summary(), &ReportConfig::default());
        let p = &charts.panels[3];
        for i in 0..p.categories.len() {
            let stack = p.series[0].values[i] + p.series[1].values[i];
            assert!((stack - 100.0).abs() < 1e-9);
        }
        assert_eq!(p.series[0].values[1], 25.0);
        assert_eq!(p.y_max, 100.0);
    }

    #[test]
    fn empty_group_yields_zero_bars() {
        let mut s = summary();
        s.distributions.push(GroupDistribution::new("C"));
        let charts = build_charts(&s, &ReportConfig::default());
        assert_eq!(charts.panels[2].series[2].values, vec![0.0; 10]);
        assert_eq!(charts.panels[3].series[0].values[2], 0.0);
    }

    #[test]
    fn nice_ceiling_steps() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(close(nice_ceiling(0.55), 1.0));
        assert!(close(nice_ceiling(0.18), 0.2));
        assert!(close(nice_ceiling(0.22), 0.25));
        assert!(close(nice_ceiling(33.0), 50.0));
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(f64::NAN), 1.0);
    }
}
