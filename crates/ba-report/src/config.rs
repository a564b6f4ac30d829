//! Report configuration types.

use serde::{Deserialize, Serialize};

/// Report color theme for the HTML viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Auto-detect from system preference.
    #[default]
    Auto,
}

impl ReportTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title, shown in the banner, chart heading, and HTML `<title>`.
    #[serde(default = "default_title")]
    pub title: String,
    /// Horizontal guide on the error-rate chart.
    #[serde(default = "default_error_rate_guide")]
    pub error_rate_guide: f64,
    /// Color theme for HTML output.
    #[serde(default)]
    pub theme: ReportTheme,
    /// Width of one chart panel in SVG pixels.
    #[serde(default = "default_panel_width")]
    pub panel_width: u32,
    /// Height of one chart panel in SVG pixels.
    #[serde(default = "default_panel_height")]
    pub panel_height: u32,
}

fn default_title() -> String {
    "COMPAS Bias Audit Report".to_string()
}

fn default_error_rate_guide() -> f64 {
    0.3
}

fn default_panel_width() -> u32 {
    600
}

fn default_panel_height() -> u32 {
    420
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            error_rate_guide: default_error_rate_guide(),
            theme: ReportTheme::default(),
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the error-rate guide line.
    pub fn with_error_rate_guide(mut self, guide: f64) -> Self {
        self.error_rate_guide = guide;
        self
    }
}
