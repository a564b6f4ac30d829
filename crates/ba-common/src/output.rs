//! How the audit report is written to stdout.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Selected with `--format`. Errors on stderr follow the same choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width console report
    #[default]
    Text,
    /// Markdown tables
    Md,
    /// Full `AuditSummary` as JSON
    Json,
    /// Single status line
    Summary,
}
