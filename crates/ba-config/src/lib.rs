//! Bias Audit policy loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for policy.json
//! - Policy path resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation

pub mod policy;
pub mod resolve;
pub mod validate;

pub use policy::{
    AuditPolicy, ColumnMap, Comparison, FairnessThresholds, FilterPolicy, ReportPolicy,
};
pub use resolve::{resolve_policy, ConfigSource, PolicyPath};
pub use validate::{validate_policy, ValidationError, ValidationResult};

/// Schema version for policy files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
