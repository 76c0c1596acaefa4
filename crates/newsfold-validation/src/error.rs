//! Error types for validation utilities.

use newsfold_data::DataError;
use thiserror::Error;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors that can occur while splitting or ranking.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Dataset has no rows (or no usable timestamps)
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Requested column is not present
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Step or offset string is malformed
    #[error("Invalid step format: {0:?}")]
    InvalidStepFormat(String),

    /// Too few values to normalize ranks
    #[error("Insufficient data: rank normalization needs at least 2 values, got {len}")]
    InsufficientData {
        /// Number of values supplied
        len: usize,
    },

    /// Value that cannot be ordered
    #[error("Non-finite value at position {index}")]
    NonFiniteValue {
        /// Position of the offending value
        index: usize,
    },

    /// Other data-layer error
    #[error("Data error: {0}")]
    Data(#[source] DataError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl From<DataError> for ValidationError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::EmptyDataset(reason) => Self::EmptyDataset(reason),
            DataError::MissingField(field) => Self::MissingField(field),
            DataError::Polars(err) => Self::Polars(err),
            other => Self::Data(other),
        }
    }
}
