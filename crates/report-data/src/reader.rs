//! CSV loading for the transaction log.
//!
//! Reads the fixed-schema export into [`RawTransaction`] rows without any
//! filtering, so that missing values can still be counted downstream.

use std::io::Read;
use std::path::Path;

use report_core::error::{ReportError, Result};
use report_core::models::{RawTransaction, REQUIRED_COLUMNS};
use tracing::debug;

/// The uncleaned transaction table, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<RawTransaction>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the transaction log at `path`.
pub fn load_transactions(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let table = load_transactions_from_reader(file)?;
    debug!("Loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

/// Load a transaction log from any reader.
///
/// The header row must name every column in [`REQUIRED_COLUMNS`]; other
/// columns are ignored. Empty cells become `None`.
pub fn load_transactions_from_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    check_required_columns(csv_reader.headers()?)?;

    let mut rows = Vec::new();
    for result in csv_reader.deserialize::<RawTransaction>() {
        let row = result.map_err(malformed_row)?;
        rows.push(row);
    }

    Ok(RawTable { rows })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn check_required_columns(headers: &csv::StringRecord) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Attach the file line number to a per-row deserialization failure.
fn malformed_row(err: csv::Error) -> ReportError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    };
    ReportError::MalformedRow { line, message }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
