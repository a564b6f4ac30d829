//! Row inclusion filter.
//!
//! A row is kept when all four predicates hold:
//! screening delta within the window, known recidivism outcome, charge degree
//! not excluded, score text present. Dropped rows are attributed to the first
//! predicate they fail.

use ba_common::FilterStats;
use ba_config::FilterPolicy;

use super::record::AuditRecord;

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    ScreeningWindow,
    UnknownRecidivism,
    ExcludedCharge,
    MissingScoreText,
}

/// Compiled inclusion predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    screening_window_days: f64,
    unknown_recid_sentinel: i64,
    excluded_charge_degrees: Vec<String>,
}

impl RecordFilter {
    pub fn from_policy(policy: &FilterPolicy) -> Self {
        Self {
            screening_window_days: policy.screening_window_days as f64,
            unknown_recid_sentinel: policy.unknown_recid_sentinel,
            excluded_charge_degrees: policy.excluded_charge_degrees.clone(),
        }
    }

    /// Replace the screening window.
    pub fn with_window(mut self, days: i64) -> Self {
        self.screening_window_days = days as f64;
        self
    }

    /// Add a charge degree to the exclusion list.
    pub fn exclude_charge(mut self, degree: impl Into<String>) -> Self {
        let degree = degree.into();
        if !self.excluded_charge_degrees.contains(&degree) {
            self.excluded_charge_degrees.push(degree);
        }
        self
    }

    /// First predicate `record` fails, or `None` if it is kept.
    pub fn check(&self, record: &AuditRecord) -> Option<DropReason> {
        match record.days_b_screening_arrest {
            Some(days) if days.abs() <= self.screening_window_days => {}
            _ => return Some(DropReason::ScreeningWindow),
        }
        if record.is_recid == self.unknown_recid_sentinel {
            return Some(DropReason::UnknownRecidivism);
        }
        if self
            .excluded_charge_degrees
            .iter()
            .any(|d| *d == record.c_charge_degree)
        {
            return Some(DropReason::ExcludedCharge);
        }
        if record.score_text.is_none() {
            return Some(DropReason::MissingScoreText);
        }
        None
    }

    pub fn keeps(&self, record: &AuditRecord) -> bool {
        self.check(record).is_none()
    }

    /// Split `records` into the kept rows and the drop tally.
    pub fn apply(&self, records: Vec<AuditRecord>) -> (Vec<AuditRecord>, FilterStats) {
        let mut stats = FilterStats {
            rows_read: records.len() as u64,
            ..FilterStats::default()
        };
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            match self.check(&record) {
                None => kept.push(record),
                Some(DropReason::ScreeningWindow) => stats.dropped_screening_window += 1,
                Some(DropReason::UnknownRecidivism) => stats.dropped_unknown_recidivism += 1,
                Some(DropReason::ExcludedCharge) => stats.dropped_excluded_charge += 1,
                Some(DropReason::MissingScoreText) => stats.dropped_missing_score_text += 1,
            }
        }
        stats.rows_kept = kept.len() as u64;
        (kept, stats)
    }
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::from_policy(&FilterPolicy::default())
    }
}
