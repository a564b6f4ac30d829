//! Error types for Bias Audit.
//!
//! Every error carries:
//! - A stable error code for machine parsing
//! - A category for grouping
//! - A headline and remediation hint for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Missing Required Columns
//!   Reason: input is missing required columns: score_text
//!   Fix: Check the CSV header, or map column names in policy.json under "columns".
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 21,
//!   "category": "data",
//!   "message": "input is missing required columns: score_text",
//!   "recoverable": true,
//!   "suggested_action": "fix_input",
//!   "context": { "columns": ["score_text"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Bias Audit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Policy file errors.
    Config,
    /// Input dataset errors.
    Data,
    /// Metric and disparity computation errors.
    Analysis,
    /// Chart or HTML rendering errors.
    Render,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Render => write!(f, "render"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested next step for automation consuming structured errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Run `bias-audit check`.
    RunCheck,
    /// Fall back to the built-in policy.
    ResetConfig,
    /// Correct the input dataset.
    FixInput,
    /// Retry the operation.
    Retry,
    /// Continue without the failed artifact.
    Skip,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::Skip => write!(f, "skip"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for Bias Audit.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid policy file: {0}")]
    InvalidPolicy(String),

    #[error("policy validation failed: {0}")]
    PolicyValidation(String),

    // Data errors (20-29)
    #[error("failed to load dataset: {0}")]
    DataLoad(String),

    #[error("input is missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("dataset has no data rows")]
    EmptyDataset,

    // Analysis errors (30-39)
    #[error("group '{group}' is not among the audited groups")]
    UnknownGroup { group: String },

    // Render errors (40-49)
    #[error("rendering failed: {0}")]
    Render(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Data errors
    /// - 30-39: Analysis errors
    /// - 40-49: Render errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidPolicy(_) => 11,
            Error::PolicyValidation(_) => 12,
            Error::DataLoad(_) => 20,
            Error::MissingColumns { .. } => 21,
            Error::MalformedRow { .. } => 22,
            Error::EmptyDataset => 23,
            Error::UnknownGroup { .. } => 31,
            Error::Render(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidPolicy(_) | Error::PolicyValidation(_) => {
                ErrorCategory::Config
            }

            Error::DataLoad(_)
            | Error::MissingColumns { .. }
            | Error::MalformedRow { .. }
            | Error::EmptyDataset => ErrorCategory::Data,

            Error::UnknownGroup { .. } => ErrorCategory::Analysis,

            Error::Render(_) => ErrorCategory::Render,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether re-running after user action could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidPolicy(_) | Error::PolicyValidation(_) => true,

            Error::DataLoad(_)
            | Error::MissingColumns { .. }
            | Error::MalformedRow { .. }
            | Error::EmptyDataset => true,

            Error::UnknownGroup { .. } => true,

            Error::Render(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns the suggested action for automation.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::InvalidPolicy(_) => SuggestedAction::ResetConfig,
            Error::PolicyValidation(_) => SuggestedAction::RunCheck,

            Error::DataLoad(_) => SuggestedAction::FixInput,
            Error::MissingColumns { .. } => SuggestedAction::FixInput,
            Error::MalformedRow { .. } => SuggestedAction::FixInput,
            Error::EmptyDataset => SuggestedAction::FixInput,

            Error::UnknownGroup { .. } => SuggestedAction::RunCheck,

            Error::Render(_) => SuggestedAction::Skip,

            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidPolicy(_) => {
                "Fix the JSON in policy.json, or print the built-in policy with 'bias-audit config default'."
            }
            Error::PolicyValidation(_) => {
                "Fix the reported field, then confirm with 'bias-audit check'."
            }

            Error::DataLoad(_) => "Check that the input path exists and is a readable CSV file.",
            Error::MissingColumns { .. } => {
                "Check the CSV header, or map column names in policy.json under \"columns\"."
            }
            Error::MalformedRow { .. } => {
                "Fix or remove the offending row. Scores must be integers 1-10 and outcomes 0 or 1."
            }
            Error::EmptyDataset => "The input has a header but no rows. Check the export step.",

            Error::UnknownGroup { .. } => {
                "Add the group to --groups, or pick --protected/--reference from the audited groups."
            }

            Error::Render(_) => {
                "Chart output failed; the text report is unaffected. Check the output directory."
            }

            Error::Io(_) => "Check disk space and permissions, then retry.",
            Error::Json(_) => "Internal serialization failure. Report this as a bug.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidPolicy(_) => "Invalid Policy File",
            Error::PolicyValidation(_) => "Policy Validation Failed",

            Error::DataLoad(_) => "Data Load Error",
            Error::MissingColumns { .. } => "Missing Required Columns",
            Error::MalformedRow { .. } => "Malformed Input Row",
            Error::EmptyDataset => "Empty Dataset",

            Error::UnknownGroup { .. } => "Unknown Group",

            Error::Render(_) => "Render Error",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for automation.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., line number, columns).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::MissingColumns { columns } => {
                context.insert("columns".to_string(), serde_json::json!(columns));
            }
            Error::MalformedRow { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::UnknownGroup { group } => {
                context.insert("group".to_string(), serde_json::json!(group));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
