//! Chart and text output tests against a realistic summary.

mod common;

use ba_report::{build_charts, looks_like_svg, render_svg, render_text, write_chart, ReportConfig};

#[test]
fn svg_has_four_panels_and_title() {
    let charts = build_charts(&common::summary("African-American", "Caucasian", false), &ReportConfig::default());
    let svg = render_svg(&charts);
    assert!(looks_like_svg(&svg));
    assert_eq!(svg.matches("class=\"panel\"").count(), 4);
    assert!(svg.contains("COMPAS Bias Audit Report"));
    assert!(svg.contains("Error Rates by Race"));
    assert!(svg.contains("80% Rule Threshold"));
    assert!(svg.contains("Did Not Recidivate"));
}

#[test]
fn svg_uses_group_colors() {
    let charts = build_charts(&common::summary("A", "B", false), &ReportConfig::default());
    let svg = render_svg(&charts);
    for color in ["#e74c3c", "#3498db", "#9b59b6", "#2ecc71", "#e67e22", "#1abc9c", "#c0392b", "#27ae60"] {
        assert!(svg.contains(color), "missing color {}", color);
    }
}

#[test]
fn svg_is_deterministic() {
    let summary = common::summary("A", "B", false);
    let config = ReportConfig::default();
    assert_eq!(
        render_svg(&build_charts(&summary, &config)),
        render_svg(&build_charts(&summary, &config))
    );
}

#[test]
fn write_chart_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    let charts = build_charts(&common::summary("A", "B", false), &ReportConfig::default());
    write_chart(&path, &charts).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_svg(&charts));
}

#[test]
fn text_report_filter_summary() {
    let text = render_text(&common::summary("African-American", "Caucasian", false), &ReportConfig::default());
    assert!(text.contains("Rows read: 250, kept: 200, dropped: 50"));
    assert!(text.contains("  outside screening window (|days| > 30): 30"));
    assert!(text.contains("High risk: decile score >= 5"));
    assert!(text.contains("Checks failed: 2 of 3 (0 not computable)"));
}

#[test]
fn text_report_degenerate_group() {
    let text = render_text(&common::summary("A", "B", true), &ReportConfig::default());
    assert!(text.contains("Checks failed: 1 of 3 (1 not computable)"));
}
