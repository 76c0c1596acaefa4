//! CSV and JSON export of fold summaries and rank targets.

use chrono::NaiveDateTime;
use newsfold_validation::Split;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Window bounds and row counts of one split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoldSummary {
    /// Zero-based fold number.
    pub fold: usize,

    /// First instant of the training window.
    pub train_start: NaiveDateTime,

    /// End of the training window (exclusive).
    pub train_end: NaiveDateTime,

    /// First instant of the validation window.
    pub val_start: NaiveDateTime,

    /// End of the validation window (exclusive).
    pub val_end: NaiveDateTime,

    /// Rows in the training subset.
    pub train_rows: usize,

    /// Rows in the validation subset.
    pub val_rows: usize,
}

impl FoldSummary {
    /// Summarize a split.
    pub fn from_split(split: &Split) -> Self {
        Self {
            fold: split.fold,
            train_start: split.train_window.start,
            train_end: split.train_window.end,
            val_start: split.validation_window.start,
            val_end: split.validation_window.end,
            train_rows: split.train.height(),
            val_rows: split.validation.height(),
        }
    }

    /// Summarize every split, in order.
    pub fn from_splits(splits: &[Split]) -> Vec<Self> {
        splits.iter().map(Self::from_split).collect()
    }
}

/// A value with its normalized rank.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RankedValue {
    /// Row position in the input.
    pub position: usize,

    /// Original value.
    pub value: f64,

    /// Normalized rank in `[0, 1]`.
    pub rank: f64,
}

impl RankedValue {
    /// Pair values with the ranks computed for them.
    pub fn zip(values: &[f64], ranks: &[f64]) -> Vec<Self> {
        values
            .iter()
            .zip(ranks)
            .enumerate()
            .map(|(position, (&value, &rank))| Self {
                position,
                value,
                rank,
            })
            .collect()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_csv<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for FoldSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(std::slice::from_ref(self)),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for [FoldSummary] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for [RankedValue] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
