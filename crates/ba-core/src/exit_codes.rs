//! Process exit codes for `bias-audit`.
//!
//! Scripts depend on these values, so they never change meaning. Codes below
//! 10 mean the audit ran; 10-19 the caller can fix; 20 and up are ours.

use ba_common::error::ErrorCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The audit ran. Under `--strict`, every check also passed.
    Clean = 0,
    /// `--strict` and at least one check failed.
    DisparityDetected = 1,

    /// Bad flags or an unknown group.
    ArgsError = 10,
    /// Dataset is missing columns, has a bad row, or filters to nothing.
    DataError = 11,
    /// Policy file unreadable or out of range.
    ConfigError = 12,

    InternalError = 20,
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable name logged next to the numeric code.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::DisparityDetected => "OK_DISPARITY",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::DataError => "ERR_DATA",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a unified error.
    pub fn for_error(err: &ba_common::Error) -> Self {
        if let ba_common::Error::UnknownGroup { .. } = err {
            return ExitCode::ArgsError;
        }
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Data => ExitCode::DataError,
            ErrorCategory::Io => ExitCode::IoError,
            ErrorCategory::Analysis | ErrorCategory::Render => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
