//! One parsed input row.

use serde::{Deserialize, Serialize};

/// A subject row with the columns the audit needs, already type-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// 1-based line number in the source file (the header is line 1).
    pub line: u64,
    pub group: String,
    /// Raw decile score. Range is checked only for rows that survive filtering.
    pub decile_score: i64,
    pub two_year_recid: bool,
    pub is_recid: i64,
    /// Days between screening and arrest, `None` when the cell is empty.
    pub days_b_screening_arrest: Option<f64>,
    pub c_charge_degree: String,
    /// `None` when the cell is empty or a missing-value marker.
    pub score_text: Option<String>,
}
