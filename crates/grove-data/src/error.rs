//! Error types for grove-data.

use std::path::PathBuf;

/// Errors from CSV loading, dataset splitting, synthetic generation and metrics.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyFile {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the header has fewer than one feature column plus the target.
    #[error("{path} needs at least one feature column and a target column, found {got} columns")]
    TooFewColumns {
        /// Path to the CSV file.
        path: PathBuf,
        /// Number of header columns.
        got: usize,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a numeric cell is NaN, Inf, or not a float at all.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index.
        col_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when an in-memory feature row does not match the declared width.
    #[error("row {row_index} has {got} features, expected {expected}")]
    RowWidthMismatch {
        /// Zero-based row index.
        row_index: usize,
        /// Number of feature names.
        expected: usize,
        /// Actual row length.
        got: usize,
    },

    /// Returned when `test_fraction` is outside `(0, 1)` or would leave a side empty.
    #[error("invalid test fraction {test_fraction} for {n_samples} samples")]
    InvalidSplit {
        /// Requested fraction of rows held out for testing.
        test_fraction: f64,
        /// Total number of rows.
        n_samples: usize,
    },

    /// Returned when a synthetic generator receives unusable parameters.
    #[error("invalid generator parameter {name}: {reason}")]
    InvalidGenerator {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned when a metric receives sequences of different lengths.
    #[error("length mismatch: {expected} true values vs {got} predictions")]
    LengthMismatch {
        /// Number of true values.
        expected: usize,
        /// Number of predictions.
        got: usize,
    },

    /// Returned when a metric receives no values.
    #[error("cannot compute a metric over zero samples")]
    EmptyInput,

    /// Returned when a label is not below the declared class count.
    #[error("label {label} out of range for {n_classes} classes")]
    LabelOutOfRange {
        /// The offending label.
        label: usize,
        /// Declared number of classes.
        n_classes: usize,
    },
}
