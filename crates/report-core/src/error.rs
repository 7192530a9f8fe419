use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while building the retail report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The dataset could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed before a row could be attributed to a line.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A data row could not be deserialized into a transaction.
    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    /// A cell could not be converted to its cleaned type.
    #[error("Cannot convert {column} value {value:?} in row {row}")]
    Conversion {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// An explicit ordering did not line up with the rows it was meant to sort.
    #[error("Ordering mismatch: expected {expected} sort keys, found {found}")]
    OrderMismatch { expected: usize, found: usize },

    /// A grouping label has no canonical sort key.
    #[error("No sort key for label: {0}")]
    UnknownOrderingLabel(String),

    /// A report could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
