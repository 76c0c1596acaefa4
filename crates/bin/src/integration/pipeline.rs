//! Load, split, rank and filter stages behind the subcommands.

use clap::ValueEnum;
use newsfold::{SplitConfig, TimeSeriesDataset, TimeWindowSplitter, filter_between};
use newsfold_data::{DataError, read_csv};
use newsfold_output::{
    ExportError, ExportFormat, Exporter, FoldReport, RankedValue, ReportError,
};
use newsfold_validation::{ValidationError, rank_column};
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Error type for pipeline stages.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    /// Loading or filtering failed.
    #[error(transparent)]
    Data(#[from] DataError),
    /// Splitting or ranking failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Export serialization failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Report serialization failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rendering of command results on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable table
    Text,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values
    Csv,
}

/// Read a CSV file into a dataset.
pub(crate) fn load(path: &Path) -> Result<TimeSeriesDataset, PipelineError> {
    let dataset = read_csv(path)?;
    info!(path = %path.display(), rows = dataset.height(), "loaded dataset");
    Ok(dataset)
}

/// Split `dataset` and summarize the folds.
pub(crate) fn split(
    dataset: &TimeSeriesDataset,
    config: &SplitConfig,
    name: &str,
) -> Result<FoldReport, PipelineError> {
    let splits = TimeWindowSplitter::with_config(config.clone()).split(dataset)?;
    if splits.is_empty() {
        warn!(
            train = %config.train_size,
            val = %config.val_size,
            "data range too short for a single fold"
        );
    } else {
        info!(folds = splits.len(), expanding = config.expanding, "split dataset");
    }
    Ok(FoldReport::from_splits(name, config.clone(), &splits))
}

/// Render a fold report.
pub(crate) fn render_split(
    report: &FoldReport,
    format: OutputFormat,
) -> Result<String, PipelineError> {
    Ok(match format {
        OutputFormat::Text => report.to_ascii_table(),
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Csv => report.folds.export_to_string(ExportFormat::Csv)?,
    })
}

/// Normalized ranks of a numeric column, paired with the values.
pub(crate) fn rank(
    dataset: &TimeSeriesDataset,
    column: &str,
) -> Result<Vec<RankedValue>, PipelineError> {
    let ranks = rank_column(dataset, column)?;
    let values: Vec<f64> = dataset
        .frame()
        .column(column)?
        .strict_cast(&DataType::Float64)?
        .f64()?
        .into_no_null_iter()
        .collect();
    info!(column, values = values.len(), "ranked column");
    Ok(RankedValue::zip(&values, &ranks))
}

/// Render ranked values.
pub(crate) fn render_rank(
    ranked: &[RankedValue],
    format: OutputFormat,
) -> Result<String, PipelineError> {
    match format {
        OutputFormat::Text => {
            let mut output = format!("{:>8} {:>16} {:>8}\n", "Position", "Value", "Rank");
            output.push_str(&"-".repeat(34));
            output.push('\n');
            for r in ranked {
                output.push_str(&format!(
                    "{:>8} {:>16.6} {:>8.4}\n",
                    r.position, r.value, r.rank
                ));
            }
            Ok(output)
        }
        OutputFormat::Json => Ok(ranked.export_to_string(ExportFormat::PrettyJson)?),
        OutputFormat::Csv => Ok(ranked.export_to_string(ExportFormat::Csv)?),
    }
}

/// Rows of `dataset` with `column` inside `[start, end)`.
pub(crate) fn filter(
    dataset: &TimeSeriesDataset,
    start: &str,
    end: &str,
    column: &str,
) -> Result<TimeSeriesDataset, PipelineError> {
    let filtered = filter_between(dataset, start, end, column)?;
    if filtered.is_empty() {
        warn!(start, end, column, "no rows in date range");
    } else {
        info!(kept = filtered.height(), of = dataset.height(), "filtered dataset");
    }
    Ok(filtered)
}

/// Write `dataset` as CSV to `path`, or to `out` when no path is given.
pub(crate) fn write_csv<W: Write>(
    dataset: &TimeSeriesDataset,
    path: Option<&Path>,
    out: &mut W,
) -> Result<(), PipelineError> {
    let mut frame = dataset.frame().clone();
    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            CsvWriter::new(&mut file).finish(&mut frame)?;
            info!(path = %path.display(), rows = frame.height(), "wrote csv");
        }
        None => CsvWriter::new(out).finish(&mut frame)?,
    }
    Ok(())
}
