//! SVG rendering of a [`ChartSet`] as a 2×2 panel grid.

use std::path::Path;

use tracing::debug;

use crate::charts::{ChartSet, Panel, PanelKind};
use crate::error::{ReportError, Result};

const HEADER_HEIGHT: f64 = 50.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 80.0;
const Y_TICKS: usize = 5;
const FONT: &str = "font-family=\"sans-serif\"";

/// Escape text for use inside SVG/XML content and attributes.
pub fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Cheap structural check on rendered output.
pub fn looks_like_svg(svg: &str) -> bool {
    let trimmed = svg.trim();
    trimmed.starts_with("<svg")
        && trimmed.ends_with("</svg>")
        && trimmed.contains("<rect")
        && trimmed.contains("<text")
}

fn tick_label(value: f64, y_max: f64) -> String {
    if y_max <= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.0}", value)
    }
}

fn value_label(value: f64, y_max: f64) -> String {
    if y_max <= 1.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.1}", value)
    }
}

struct Frame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn plot_left(&self) -> f64 {
        self.x + MARGIN_LEFT
    }

    fn plot_top(&self) -> f64 {
        self.y + MARGIN_TOP
    }

    fn plot_width(&self) -> f64 {
        (self.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0)
    }

    fn plot_height(&self) -> f64 {
        (self.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0)
    }

    fn plot_bottom(&self) -> f64 {
        self.plot_top() + self.plot_height()
    }

    /// Map a data value to a y coordinate, clamped to the axis range.
    fn y_of(&self, value: f64, y_max: f64) -> f64 {
        let v = if value.is_finite() { value } else { 0.0 };
        let frac = (v / y_max).clamp(0.0, 1.0);
        self.plot_bottom() - frac * self.plot_height()
    }
}

fn render_panel(svg: &mut String, panel: &Panel, frame: &Frame, index: usize) {
    let y_max = if panel.y_max > 0.0 { panel.y_max } else { 1.0 };
    let left = frame.plot_left();
    let top = frame.plot_top();
    let bottom = frame.plot_bottom();
    let width = frame.plot_width();

    svg.push_str(&format!(
        "<g class=\"panel\" id=\"panel-{}\">",
        index
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" {} font-size=\"14\" font-weight=\"bold\" text-anchor=\"middle\">{}</text>",
        left + width / 2.0,
        frame.y + 24.0,
        FONT,
        xml_escape(&panel.title)
    ));

    for i in 0..=Y_TICKS {
        let value = y_max * i as f64 / Y_TICKS as f64;
        let y = frame.y_of(value, y_max);
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#dddddd\" stroke-width=\"1\"/>",
            left,
            y,
            left + width,
            y
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" {} font-size=\"10\" text-anchor=\"end\">{}</text>",
            left - 6.0,
            y + 3.0,
            FONT,
            tick_label(value, y_max)
        ));
    }

    let categories = panel.categories.len().max(1);
    let slot = width / categories as f64;
    let series_count = panel.series.len().max(1);

    for (c, category) in panel.categories.iter().enumerate() {
        let slot_left = left + slot * c as f64;
        match panel.kind {
            PanelKind::Grouped => {
                let group_width = slot * 0.8;
                let bar_width = group_width / series_count as f64;
                for (s, series) in panel.series.iter().enumerate() {
                    let value = series.values.get(c).copied().unwrap_or(0.0);
                    let x = slot_left + slot * 0.1 + bar_width * s as f64;
                    let y = frame.y_of(value, y_max);
                    svg.push_str(&format!(
                        "<rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {}</title></rect>",
                        x,
                        y,
                        bar_width,
                        bottom - y,
                        xml_escape(series.color_at(c)),
                        xml_escape(&series.label),
                        value_label(value, y_max)
                    ));
                }
            }
            PanelKind::Stacked => {
                let bar_width = slot * 0.5;
                let x = slot_left + slot * 0.25;
                let mut base = 0.0;
                for series in &panel.series {
                    let value = series.values.get(c).copied().unwrap_or(0.0);
                    let y_low = frame.y_of(base, y_max);
                    let y_high = frame.y_of(base + value, y_max);
                    svg.push_str(&format!(
                        "<rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {:.1}</title></rect>",
                        x,
                        y_high,
                        bar_width,
                        y_low - y_high,
                        xml_escape(series.color_at(c)),
                        xml_escape(&series.label),
                        value
                    ));
                    base += value;
                }
            }
        }

        let label_x = slot_left + slot / 2.0;
        let label_y = bottom + 16.0;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" {} font-size=\"11\" text-anchor=\"end\" transform=\"rotate(-45 {:.1} {:.1})\">{}</text>",
            label_x,
            label_y,
            FONT,
            label_x,
            label_y,
            xml_escape(category)
        ));
    }

    svg.push_str(&format!(
        "<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"#333333\"/><line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"#333333\"/>",
        l = left,
        t = top,
        b = bottom,
        r = left + width
    ));

    if let Some(guide) = &panel.reference_line {
        let y = frame.y_of(guide.value, y_max);
        svg.push_str(&format!(
            "<line class=\"reference\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1.5\" stroke-dasharray=\"6 4\" stroke-opacity=\"0.5\"/>",
            left,
            y,
            left + width,
            y,
            xml_escape(&guide.color)
        ));
    }

    if !panel.y_label.is_empty() {
        let x = frame.x + 16.0;
        let y = top + frame.plot_height() / 2.0;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" {} font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 {:.1} {:.1})\">{}</text>",
            x,
            y,
            FONT,
            x,
            y,
            xml_escape(&panel.y_label)
        ));
    }
    if !panel.x_label.is_empty() {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" {} font-size=\"12\" text-anchor=\"middle\">{}</text>",
            left + width / 2.0,
            frame.y + frame.height - 12.0,
            FONT,
            xml_escape(&panel.x_label)
        ));
    }

    render_legend(svg, panel, left + width - 170.0, top + 8.0);
    svg.push_str("</g>");
}

fn render_legend(svg: &mut String, panel: &Panel, x: f64, y: f64) {
    let mut row = 0.0;
    // A single multi-colored series is labeled by its categories instead.
    let per_bar = panel.series.len() == 1 && panel.series[0].colors.len() > 1;
    let entries: Vec<(String, String)> = if per_bar {
        let series = &panel.series[0];
        panel
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), series.color_at(i).to_string()))
            .collect()
    } else {
        panel
            .series
            .iter()
            .map(|s| (s.label.clone(), s.color_at(0).to_string()))
            .collect()
    };

    svg.push_str("<g class=\"legend\">");
    for (label, color) in entries {
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/><text x=\"{:.1}\" y=\"{:.1}\" {} font-size=\"11\">{}</text>",
            x,
            y + row,
            xml_escape(&color),
            x + 18.0,
            y + row + 10.0,
            FONT,
            xml_escape(&label)
        ));
        row += 16.0;
    }
    if let Some(guide) = &panel.reference_line {
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-dasharray=\"6 4\" stroke-opacity=\"0.5\"/><text x=\"{:.1}\" y=\"{:.1}\" {} font-size=\"11\">{}</text>",
            x,
            y + row + 6.0,
            x + 12.0,
            y + row + 6.0,
            xml_escape(&guide.color),
            x + 18.0,
            y + row + 10.0,
            FONT,
            xml_escape(&guide.label)
        ));
    }
    svg.push_str("</g>");
}

/// Render the chart set as a standalone SVG document with a 2×2 grid.
pub fn render_svg(charts: &ChartSet) -> String {
    let panel_width = f64::from(charts.panel_width.max(200));
    let panel_height = f64::from(charts.panel_height.max(200));
    let width = panel_width * 2.0;
    let rows = charts.panels.len().div_ceil(2).max(1);
    let height = HEADER_HEIGHT + panel_height * rows as f64;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">",
        w = width,
        h = height
    ));
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{:.0}\" height=\"{:.0}\" fill=\"#ffffff\"/>",
        width, height
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"32\" {} font-size=\"20\" font-weight=\"bold\" text-anchor=\"middle\">{}</text>",
        width / 2.0,
        FONT,
        xml_escape(&charts.title)
    ));

    for (i, panel) in charts.panels.iter().enumerate() {
        let frame = Frame {
            x: panel_width * (i % 2) as f64,
            y: HEADER_HEIGHT + panel_height * (i / 2) as f64,
            width: panel_width,
            height: panel_height,
        };
        render_panel(&mut svg, panel, &frame, i);
    }

    svg.push_str("</svg>");
    svg
}

/// Render the chart set and write it to `path`.
pub fn write_chart(path: &Path, charts: &ChartSet) -> Result<()> {
    let svg = render_svg(charts);
    if !looks_like_svg(&svg) {
        return Err(ReportError::RenderError(
            "rendered chart is not a valid SVG document".to_string(),
        ));
    }
    std::fs::write(path, svg.as_bytes()).map_err(|source| ReportError::WriteError {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = svg.len(), "chart written");
    Ok(())
}
