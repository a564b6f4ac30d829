//! Standalone HTML viewer.
//!
//! The page is fully self-contained: the SVG chart grid is inlined, the
//! tables are plain HTML, and the serialized summary is embedded as JSON for
//! tooling that wants to scrape it. No external assets are referenced.

use crate::charts::build_charts;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::svg::render_svg;

use ba_common::{AuditSummary, RatioValue, Verdict};
use ba_math::Rate;
use std::path::Path;
use tracing::{debug, info};

/// Escape text for HTML content and attribute values.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn rate_cell(rate: &Rate) -> String {
    if rate.is_defined() {
        format!(
            "<td class=\"num\" data-value=\"{v:.6}\" title=\"{n}/{d}\">{v:.3}</td>",
            v = rate.value(),
            n = rate.numerator,
            d = rate.denominator
        )
    } else {
        "<td class=\"num sentinel\" data-value=\"0\" title=\"zero denominator\">0.000*</td>"
            .to_string()
    }
}

fn verdict_class(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "pass",
        Verdict::Fail => "fail",
        Verdict::Undefined => "undefined",
    }
}

/// HTML report generator.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a new report generator with configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn default_config() -> Self {
        Self::new(ReportConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate the HTML page for a summary.
    pub fn generate(&self, summary: &AuditSummary) -> Result<String> {
        // `</` would end the script element early.
        let data_json = serde_json::to_string(summary)?.replace("</", "<\\/");
        let html = self.generate_html(summary, &data_json);
        info!(bytes = html.len(), title = %self.config.title, "HTML report generated");
        Ok(html)
    }

    /// Generate the page and write it to `path`.
    pub fn write(&self, path: &Path, summary: &AuditSummary) -> Result<()> {
        let html = self.generate(summary)?;
        std::fs::write(path, html.as_bytes()).map_err(|source| {
            crate::ReportError::WriteError {
                path: path.display().to_string(),
                source,
            }
        })?;
        debug!(path = %path.display(), "HTML report written");
        Ok(())
    }

    fn metrics_rows(&self, summary: &AuditSummary) -> String {
        let mut rows = String::new();
        for m in &summary.metrics {
            rows.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\" data-value=\"{}\">{}</td>{}{}{}{}{}</tr>\n",
                html_escape(&m.group),
                m.sample_size,
                m.sample_size,
                rate_cell(&m.false_positive_rate),
                rate_cell(&m.false_negative_rate),
                rate_cell(&m.positive_predictive_value),
                rate_cell(&m.negative_predictive_value),
                rate_cell(&m.selection_rate),
            ));
        }
        rows
    }

    fn disparity_rows(&self, summary: &AuditSummary) -> String {
        let mut rows = String::new();
        for (label, check) in summary.disparity.checks() {
            let value = match &check.value {
                RatioValue::Defined { value } => format!("{:.3}", value),
                RatioValue::Undefined { reason } => {
                    format!("N/A <span class=\"reason\">({})</span>", html_escape(reason))
                }
            };
            rows.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\">{}</td><td>{}</td><td><span class=\"badge {}\">{}</span></td></tr>\n",
                label,
                value,
                html_escape(&check.threshold.to_string()),
                verdict_class(check.verdict),
                check.verdict
            ));
        }
        rows
    }

    fn generate_html(&self, summary: &AuditSummary, data_json: &str) -> String {
        let title = html_escape(&self.config.title);
        let theme_class = self.config.theme.css_class();
        let svg = render_svg(&build_charts(summary, &self.config));
        let filter = &summary.filter;

        format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="bias-audit {version}">
    <meta name="schema-version" content="{schema_version}">
    <meta name="robots" content="noindex, nofollow">
    <style>
        :root {{
            --bg-primary: #ffffff;
            --bg-secondary: #f9fafb;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #e5e7eb;
            --accent-color: #3b82f6;
        }}
        .dark {{
            --bg-primary: #111827;
            --bg-secondary: #1f2937;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --border-color: #374151;
            --accent-color: #60a5fa;
        }}
        @media (prefers-color-scheme: dark) {{
            :root:not(.light) {{
                --bg-primary: #111827;
                --bg-secondary: #1f2937;
                --text-primary: #f9fafb;
                --text-secondary: #9ca3af;
                --border-color: #374151;
                --accent-color: #60a5fa;
            }}
        }}
        body {{
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            line-height: 1.5;
            margin: 0 auto;
            max-width: 1240px;
            padding: 1rem;
        }}
        .card {{
            background-color: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 0.5rem;
            padding: 1.5rem;
            margin-bottom: 1rem;
        }}
        .stat-label {{ font-size: 0.875rem; color: var(--text-secondary); }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border-bottom: 1px solid var(--border-color); padding: 0.4rem 0.6rem; text-align: left; }}
        th[data-sort] {{ cursor: pointer; }}
        td.num {{ text-align: right; font-variant-numeric: tabular-nums; }}
        td.sentinel {{ color: var(--text-secondary); font-style: italic; }}
        .reason {{ color: var(--text-secondary); font-size: 0.8rem; }}
        .badge {{
            display: inline-flex;
            padding: 0.1rem 0.6rem;
            border-radius: 9999px;
            font-size: 0.75rem;
            font-weight: 600;
        }}
        .badge.pass {{ background: #dcfce7; color: #166534; }}
        .badge.fail {{ background: #fee2e2; color: #991b1b; }}
        .badge.undefined {{ background: #e5e7eb; color: #374151; }}
        .chart svg {{ width: 100%; height: auto; background: #ffffff; }}
        @media print {{
            .no-print {{ display: none !important; }}
            body {{ font-size: 10pt; }}
        }}
    </style>
</head>
<body>
    <header class="card">
        <h1>{title}</h1>
        <div class="stat-label">Input: {input} &middot; {kept} of {read} rows kept &middot; high risk at decile score &gt;= {threshold} &middot; generated {generated_at}</div>
    </header>
    <main>
        <section class="card" id="metrics">
            <h2>Fairness metrics by {group_column}</h2>
            <table id="metrics-table">
                <thead><tr><th data-sort="0">Group</th><th data-sort="1">Sample Size</th><th data-sort="2">False Positive Rate</th><th data-sort="3">False Negative Rate</th><th data-sort="4">Positive Predictive Value</th><th data-sort="5">Negative Predictive Value</th><th data-sort="6">Selection Rate</th></tr></thead>
                <tbody>
{metrics_rows}                </tbody>
            </table>
            <p class="stat-label">* rate has a zero denominator and is reported as 0.</p>
        </section>
        <section class="card" id="disparity">
            <h2>Disparity: {protected} vs {reference}</h2>
            <table>
                <thead><tr><th>Check</th><th>Value</th><th>Threshold</th><th>Verdict</th></tr></thead>
                <tbody>
{disparity_rows}                </tbody>
            </table>
        </section>
        <section class="card chart" id="charts">
{svg}
        </section>
    </main>
    <script type="application/json" id="audit-data">{data_json}</script>
    <script>
        document.querySelectorAll('#metrics-table th[data-sort]').forEach(function (th) {{
            th.addEventListener('click', function () {{
                var col = Number(th.dataset.sort);
                var body = document.querySelector('#metrics-table tbody');
                var rows = Array.from(body.rows);
                var asc = th.dataset.dir !== 'asc';
                th.dataset.dir = asc ? 'asc' : 'desc';
                rows.sort(function (a, b) {{
                    var x = a.cells[col].dataset.value || a.cells[col].textContent;
                    var y = b.cells[col].dataset.value || b.cells[col].textContent;
                    var nx = Number(x), ny = Number(y);
                    var cmp = (isNaN(nx) || isNaN(ny)) ? x.localeCompare(y) : nx - ny;
                    return asc ? cmp : -cmp;
                }});
                rows.forEach(function (r) {{ body.appendChild(r); }});
            }});
        }});
    </script>
</body>
</html>
"##,
            theme_class = theme_class,
            title = title,
            version = html_escape(&summary.generator_version),
            schema_version = html_escape(&summary.schema_version),
            input = html_escape(&summary.input),
            kept = filter.rows_kept,
            read = filter.rows_read,
            threshold = summary.policy.high_risk_threshold,
            generated_at = summary.generated_at.to_rfc3339(),
            group_column = html_escape(&summary.policy.group_column),
            metrics_rows = self.metrics_rows(summary),
            protected = html_escape(&summary.disparity.protected_group),
            reference = html_escape(&summary.disparity.reference_group),
            disparity_rows = self.disparity_rows(summary),
            svg = svg,
            data_json = data_json,
        )
    }
}
