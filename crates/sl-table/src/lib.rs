//! sl-table: raw test-log table format and batch validation.
//!
//! The reader turns an instrument CSV export into an untyped table and
//! refuses only structurally broken files; everything value-level is the
//! validator's job, so a technician sees every defect of a file in one pass.

pub mod reader;
pub mod schema;
pub mod validate;

pub use reader::{RawRow, RawTable, read_table, read_table_file};
pub use schema::{ColumnPolicy, EXPECTED_COLUMNS, Requirement, TypicalRange, ValidationPolicy};
pub use validate::{
    Severity, StepReading, ValidationMessage, ValidationResult, validate_table,
};

pub type TableResult<T> = Result<T, TableError>;

/// Fatal file-level failures. Row and field defects are never errors here;
/// they become [`ValidationMessage`]s instead.
#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("Empty file: expected a #TYPE marker line")]
    Empty,

    #[error("Missing #TYPE marker (first line reads '{found}')")]
    MissingTypeMarker { found: String },

    #[error("Missing {what} line (file ends after line {after})")]
    TruncatedPreamble { what: &'static str, after: usize },

    #[error("Preamble line {line} is not a {expected} declaration (found '{found}')")]
    BadPreambleTag {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("CSV parsing error (line {line}): {source}")]
    Csv { line: usize, source: csv::Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
