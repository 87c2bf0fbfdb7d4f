//! Flat-file tables.
//!
//! All persistent bookkeeping of a fitting run lives in tab-delimited text
//! files. The first line is a `#` comment declaring the column names (with
//! units in parentheses where applicable); further `#` lines and blank lines
//! are ignored on read. Missing values are written as `--`. Files are
//! written atomically: a temporary sibling is written and renamed over the
//! target, so a crash never leaves a half-written table.

mod best;
mod chi_squared;
mod elitism;
mod generations;
mod individuals;
mod parameters;
mod timing;
mod weights;

pub use best::{BestParametersRow, BestParametersTable};
pub use chi_squared::{ChiSquaredRow, ChiSquaredTable};
pub use elitism::ElitismTable;
pub use generations::{GenerationRow, GenerationStatus, GenerationsTable};
pub use individuals::{IndividualsRow, IndividualsTable};
pub use parameters::{ParametersRow, ParametersTable};
pub use timing::{MemoryRow, MemoryTable, TimingRow, TimingTable};
pub use weights::{WeightRow, WeightsTable};

use crate::errors::TableError;
use std::fs;
use std::path::Path;

/// Marker for a missing value, compatible with masked-column readers.
pub const MISSING: &str = "--";

/// Write `content` to `path` atomically (temp file + rename).
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<(), TableError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Render the header comment line for a set of columns.
pub(crate) fn header_line(columns: &[String]) -> String {
    format!("# {}\n", columns.join("\t"))
}

/// A parsed data row: 1-based line number plus raw fields.
pub(crate) struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Read a table file: returns the declared columns and the data rows.
pub(crate) fn read_raw(path: &Path) -> Result<(Vec<String>, Vec<RawRow>), TableError> {
    let content = fs::read_to_string(path)?;
    let mut columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            // The first comment line declares the columns.
            if columns.is_none() {
                columns = Some(comment.trim().split('\t').map(str::to_string).collect());
            }
            continue;
        }
        rows.push(RawRow {
            line,
            fields: trimmed.split('\t').map(str::to_string).collect(),
        });
    }

    let columns = columns.ok_or(TableError::Parse {
        line: 1,
        message: "missing header comment line".to_string(),
    })?;
    Ok((columns, rows))
}

/// Check that a row has the expected number of fields.
pub(crate) fn expect_fields(row: &RawRow, expected: usize) -> Result<(), TableError> {
    if row.fields.len() != expected {
        return Err(TableError::Parse {
            line: row.line,
            message: format!("expected {expected} fields, found {}", row.fields.len()),
        });
    }
    Ok(())
}

pub(crate) fn parse_f64(field: &str, line: usize) -> Result<f64, TableError> {
    field.parse::<f64>().map_err(|_| TableError::Parse {
        line,
        message: format!("not a number: '{field}'"),
    })
}

pub(crate) fn parse_usize(field: &str, line: usize) -> Result<usize, TableError> {
    field.parse::<usize>().map_err(|_| TableError::Parse {
        line,
        message: format!("not a count: '{field}'"),
    })
}

pub(crate) fn parse_i64(field: &str, line: usize) -> Result<i64, TableError> {
    field.parse::<i64>().map_err(|_| TableError::Parse {
        line,
        message: format!("not an integer: '{field}'"),
    })
}

/// Parse a field that may carry the missing marker.
pub(crate) fn parse_opt_i64(field: &str, line: usize) -> Result<Option<i64>, TableError> {
    if field == MISSING {
        Ok(None)
    } else {
        parse_i64(field, line).map(Some)
    }
}

/// Current time as unix seconds.
pub(crate) fn timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
