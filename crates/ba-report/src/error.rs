//! Error types for report rendering.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while rendering or writing report artifacts.
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Output sink could not be written.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Chart rendering produced unusable output.
    #[error("render error: {0}")]
    RenderError(String),
}

impl From<ReportError> for ba_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::JsonError(e) => ba_common::Error::Json(e),
            other => ba_common::Error::Render(other.to_string()),
        }
    }
}
