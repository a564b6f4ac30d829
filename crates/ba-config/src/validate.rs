//! Policy validation errors and semantic validation.

use thiserror::Error;

use crate::policy::AuditPolicy;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Policy validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate an audit policy semantically.
///
/// Returns the first problem found.
pub fn validate_policy(policy: &AuditPolicy) -> ValidationResult<()> {
    if policy.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: policy.schema_version.clone(),
        });
    }

    if !(1..=10).contains(&policy.high_risk_threshold) {
        return Err(ValidationError::InvalidValue {
            field: "high_risk_threshold".to_string(),
            message: format!("Must be in [1, 10], got {}", policy.high_risk_threshold),
        });
    }

    if policy.filter.screening_window_days < 0 {
        return Err(ValidationError::InvalidValue {
            field: "filter.screening_window_days".to_string(),
            message: format!(
                "Must be non-negative, got {}",
                policy.filter.screening_window_days
            ),
        });
    }

    validate_columns(policy)?;
    validate_groups(policy)?;
    validate_thresholds(policy)?;

    Ok(())
}

fn validate_columns(policy: &AuditPolicy) -> ValidationResult<()> {
    let required = policy.columns.required();
    if let Some(blank) = required.iter().position(|c| c.trim().is_empty()) {
        return Err(ValidationError::InvalidValue {
            field: "columns".to_string(),
            message: format!("Column name #{} is empty", blank + 1),
        });
    }
    for (i, name) in required.iter().enumerate() {
        if required[..i].contains(name) {
            return Err(ValidationError::SemanticError(format!(
                "Column '{}' is mapped to more than one field",
                name
            )));
        }
    }
    Ok(())
}

fn validate_groups(policy: &AuditPolicy) -> ValidationResult<()> {
    if policy.groups.is_empty() {
        return Err(ValidationError::SemanticError(
            "groups must list at least one group".to_string(),
        ));
    }
    for (i, group) in policy.groups.iter().enumerate() {
        if policy.groups[..i].contains(group) {
            return Err(ValidationError::SemanticError(format!(
                "group '{}' is listed more than once",
                group
            )));
        }
    }
    for (field, group) in [
        ("comparison.protected", &policy.comparison.protected),
        ("comparison.reference", &policy.comparison.reference),
    ] {
        if !policy.groups.contains(group) {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("'{}' is not one of the audited groups", group),
            });
        }
    }
    Ok(())
}

fn validate_thresholds(policy: &AuditPolicy) -> ValidationResult<()> {
    let di = policy.thresholds.disparate_impact;
    if !(di > 0.0 && di <= 1.0) {
        return Err(ValidationError::InvalidValue {
            field: "thresholds.disparate_impact".to_string(),
            message: format!("Must be in (0, 1], got {}", di),
        });
    }

    let (low, high) = policy.thresholds.error_rate_parity_band;
    if !(low > 0.0 && low <= 1.0 && high >= 1.0 && high.is_finite()) {
        return Err(ValidationError::InvalidValue {
            field: "thresholds.error_rate_parity_band".to_string(),
            message: format!("Must satisfy 0 < low <= 1 <= high, got [{}, {}]", low, high),
        });
    }

    let guide = policy.report.error_rate_guide;
    if !(0.0..=1.0).contains(&guide) {
        return Err(ValidationError::InvalidValue {
            field: "report.error_rate_guide".to_string(),
            message: format!("Must be in [0, 1], got {}", guide),
        });
    }

    Ok(())
}
