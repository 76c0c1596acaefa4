//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Dataset has no rows (or no usable timestamps)
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Requested column is not present
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A timestamp string could not be parsed
    #[error("Invalid timestamp in column {column}: {value:?}")]
    InvalidTimestamp {
        /// Column holding the value
        column: String,
        /// Offending raw value
        value: String,
    },

    /// Column cannot be interpreted as timestamps
    #[error("Column {column} is not temporal (dtype {dtype})")]
    NonTemporalColumn {
        /// Column name
        column: String,
        /// Actual polars dtype
        dtype: String,
    },

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start of the range
        start: String,
        /// End of the range
        end: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
