//! Stable event names and pipeline stages for structured logs.

use serde::{Deserialize, Serialize};

/// Processing stages in the audit pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup, argument parsing and policy resolution.
    Init,
    /// CSV ingestion.
    Load,
    /// Row inclusion filter.
    Filter,
    /// Per-group confusion matrices and rates.
    Metrics,
    /// Cross-group ratios.
    Disparity,
    /// Text, chart, and HTML output.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Filter => "filter",
            Stage::Metrics => "metrics",
            Stage::Disparity => "disparity",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Pipeline stages
    pub const LOAD_FINISHED: &str = "load.finished";
    pub const FILTER_FINISHED: &str = "filter.finished";
    pub const METRICS_GROUP_DONE: &str = "metrics.group_done";
    pub const DISPARITY_FINISHED: &str = "disparity.finished";

    // Report sinks
    pub const RENDER_WRITTEN: &str = "render.written";
    pub const RENDER_FAILED: &str = "render.failed";
}
