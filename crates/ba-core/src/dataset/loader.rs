//! CSV loading.
//!
//! The header row is matched against the configured column names; extra
//! columns are ignored. Every row is type-checked on the way in so that the
//! filter and metric stages never see unparseable values.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ba_config::AuditPolicy;
use thiserror::Error;
use tracing::debug;

use super::record::AuditRecord;

/// Errors raised while reading the input dataset. All are fatal.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv { line: Option<u64>, message: String },

    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("line {line}, column '{column}': {reason} (got '{value}')")]
    MalformedRow {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("dataset has no data rows")]
    Empty,
}

impl From<csv::Error> for DataLoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        DataLoadError::Csv {
            line,
            message: err.to_string(),
        }
    }
}

impl From<DataLoadError> for ba_common::Error {
    fn from(err: DataLoadError) -> Self {
        match err {
            DataLoadError::Open { source, .. } => ba_common::Error::Io(source),
            DataLoadError::Csv { .. } => ba_common::Error::DataLoad(err.to_string()),
            DataLoadError::MissingColumns { columns } => {
                ba_common::Error::MissingColumns { columns }
            }
            DataLoadError::MalformedRow {
                line,
                column,
                value,
                reason,
            } => ba_common::Error::MalformedRow {
                line,
                reason: format!("column '{}': {} (got '{}')", column, reason, value),
            },
            DataLoadError::Empty => ba_common::Error::EmptyDataset,
        }
    }
}

/// Column positions resolved from the header row.
struct ColumnIndex {
    group: usize,
    decile_score: usize,
    two_year_recid: usize,
    is_recid: usize,
    days_b_screening_arrest: usize,
    c_charge_degree: usize,
    score_text: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, policy: &AuditPolicy) -> Result<Self, DataLoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let missing: Vec<String> = policy
            .columns
            .required()
            .iter()
            .filter(|name| find(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns { columns: missing });
        }

        let cols = &policy.columns;
        let at = |name: &String| find(name.as_str()).unwrap_or_default();
        Ok(Self {
            group: at(&cols.group),
            decile_score: at(&cols.decile_score),
            two_year_recid: at(&cols.two_year_recid),
            is_recid: at(&cols.is_recid),
            days_b_screening_arrest: at(&cols.days_b_screening_arrest),
            c_charge_degree: at(&cols.c_charge_degree),
            score_text: at(&cols.score_text),
        })
    }
}

struct RowParser<'a> {
    line: u64,
    row: &'a csv::StringRecord,
}

impl RowParser<'_> {
    fn cell(&self, index: usize) -> &str {
        self.row.get(index).unwrap_or("")
    }

    fn malformed(&self, column: &str, value: &str, reason: &str) -> DataLoadError {
        DataLoadError::MalformedRow {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Integer cell. Accepts integral floats such as `1.0`.
    fn integer(&self, index: usize, column: &str) -> Result<i64, DataLoadError> {
        let raw = self.cell(index);
        parse_integer(raw).ok_or_else(|| self.malformed(column, raw, "expected an integer"))
    }

    fn binary(&self, index: usize, column: &str) -> Result<bool, DataLoadError> {
        match self.integer(index, column)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(self.malformed(column, self.cell(index), "expected 0 or 1")),
        }
    }

    fn optional_number(&self, index: usize, column: &str) -> Result<Option<f64>, DataLoadError> {
        let raw = self.cell(index);
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            Ok(v) if v.is_nan() => Ok(None),
            _ => Err(self.malformed(column, raw, "expected a number")),
        }
    }
}

fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        Some(f as i64)
    } else {
        None
    }
}

/// Load records from a CSV file.
pub fn load_records(path: &Path, policy: &AuditPolicy) -> Result<Vec<AuditRecord>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file, policy)
}

/// Load records from any CSV byte stream.
pub fn read_records<R: Read>(
    reader: R,
    policy: &AuditPolicy,
) -> Result<Vec<AuditRecord>, DataLoadError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(DataLoadError::Empty);
    }
    let idx = ColumnIndex::resolve(&headers, policy)?;
    let cols = &policy.columns;
    let markers = &policy.filter.missing_score_text_markers;

    let mut records = Vec::new();
    for (i, row) in csv.records().enumerate() {
        let row = row?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(i as u64 + 2);
        let p = RowParser { line, row: &row };

        let score_text = p.cell(idx.score_text);
        let score_text = if score_text.is_empty() || markers.iter().any(|m| m == score_text) {
            None
        } else {
            Some(score_text.to_string())
        };

        records.push(AuditRecord {
            line,
            group: p.cell(idx.group).to_string(),
            decile_score: p.integer(idx.decile_score, &cols.decile_score)?,
            two_year_recid: p.binary(idx.two_year_recid, &cols.two_year_recid)?,
            is_recid: p.integer(idx.is_recid, &cols.is_recid)?,
            days_b_screening_arrest: p
                .optional_number(idx.days_b_screening_arrest, &cols.days_b_screening_arrest)?,
            c_charge_degree: p.cell(idx.c_charge_degree).to_string(),
            score_text,
        });
    }

    if records.is_empty() {
        return Err(DataLoadError::Empty);
    }

    debug!(rows = records.len(), "dataset parsed");
    Ok(records)
}
