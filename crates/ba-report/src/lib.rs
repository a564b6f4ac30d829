//! Report rendering for bias audits.
//!
//! Turns an [`ba_common::AuditSummary`] into:
//!
//! - **Text**: deterministic fixed-width report for stdout
//! - **Markdown**: the same content as Markdown tables
//! - **Charts**: four chart panels as plain data ([`ChartSet`])
//! - **SVG**: a 2×2 multi-panel image of the chart set
//! - **HTML**: a standalone viewer page embedding the SVG and tables
//!
//! Chart construction never touches the filesystem, so it can be tested
//! without an output sink. Sink failures surface as [`ReportError`] and
//! never affect the text report.
//!
//! # Example
//!
//! ```no_run
//! use ba_report::{build_charts, render_svg, render_text, ReportConfig};
//! # fn demo(summary: &ba_common::AuditSummary) {
//! let config = ReportConfig::default();
//! println!("{}", render_text(summary, &config));
//! let svg = render_svg(&build_charts(summary, &config));
//! # let _ = svg;
//! # }
//! ```

pub mod charts;
pub mod config;
pub mod error;
pub mod html;
pub mod svg;
pub mod text;

pub use charts::{build_charts, ChartSet, Panel, PanelKind, ReferenceLine, Series};
pub use config::{ReportConfig, ReportTheme};
pub use error::{ReportError, Result};
pub use html::ReportGenerator;
pub use svg::{looks_like_svg, render_svg, write_chart};
pub use text::{render_markdown, render_text};
