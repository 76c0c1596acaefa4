//! Expanding and sliding time-series cross-validation.
//!
//! Windows are anchored at the earliest timestamp of the dataset. The first
//! training window spans `train_size`, and each validation window spans
//! `val_size` immediately after its training window. After each split the
//! training window either grows by `step` (expanding) or moves forward by
//! `step` keeping its size (sliding). Splitting stops as soon as a
//! validation window would end after the latest timestamp.

use crate::error::{Result, ValidationError};
use crate::offset::CalendarOffset;
use chrono::NaiveDateTime;
use newsfold_data::{DEFAULT_TIMESTAMP_FIELD, TimeSeriesDataset, Window};
use serde::{Deserialize, Serialize};

/// Configuration for the [`TimeWindowSplitter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Column holding the timestamps (default: `datetime`)
    pub timestamp_field: String,
    /// Length of the initial training window (default: 2 years)
    pub train_size: CalendarOffset,
    /// Length of each validation window (default: 1 year)
    pub val_size: CalendarOffset,
    /// Increment applied after each split (default: 1 year)
    pub step: CalendarOffset,
    /// Grow the training window instead of sliding it (default: true)
    pub expanding: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            train_size: CalendarOffset::years(2),
            val_size: CalendarOffset::years(1),
            step: CalendarOffset::years(1),
            expanding: true,
        }
    }
}

impl SplitConfig {
    /// Reject configurations whose split loop would never advance.
    ///
    /// Zero train or validation sizes are accepted and give empty subsets.
    pub fn validate(&self) -> Result<()> {
        // A zero step leaves train_end (expanding) or train_start (sliding)
        // where it is, so the loop would never terminate.
        if self.step.is_zero() {
            return Err(ValidationError::InvalidStepFormat(self.step.to_string()));
        }
        Ok(())
    }
}

/// One (train, validation) partition.
#[derive(Debug, Clone)]
pub struct Split {
    /// Zero-based position in the split sequence
    pub fold: usize,
    /// Training interval `[train_start, train_end)`
    pub train_window: Window,
    /// Validation interval `[train_end, train_end + val_size)`
    pub validation_window: Window,
    /// Rows inside the training interval
    pub train: TimeSeriesDataset,
    /// Rows inside the validation interval
    pub validation: TimeSeriesDataset,
}

/// Produces chronologically ordered train/validation splits.
#[derive(Debug, Clone, Default)]
pub struct TimeWindowSplitter {
    config: SplitConfig,
}

impl TimeWindowSplitter {
    /// Create a splitter from a configuration.
    pub const fn with_config(config: SplitConfig) -> Self {
        Self { config }
    }

    /// The splitter's configuration.
    pub const fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Window bounds for data spanning `[start, end]`, oldest first.
    ///
    /// Each item is `(train_window, validation_window)`. Empty when even the
    /// first split does not fit.
    pub fn windows(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<(Window, Window)>> {
        self.config.validate()?;

        let SplitConfig {
            train_size,
            val_size,
            step,
            expanding,
            ..
        } = self.config;

        let mut windows = Vec::new();
        let mut train_start = start;
        // A bound that overflows the calendar lies past any data.
        let Some(mut train_end) = train_size.apply(start) else {
            return Ok(windows);
        };

        while let Some(val_end) = val_size.apply(train_end) {
            if val_end > end {
                break;
            }
            windows.push((
                Window::new(train_start, train_end),
                Window::new(train_end, val_end),
            ));

            let next = if expanding {
                step.apply(train_end)
            } else {
                step.apply(train_start).and_then(|next_start| {
                    train_start = next_start;
                    train_size.apply(next_start)
                })
            };
            match next {
                Some(next_end) => train_end = next_end,
                None => break,
            }
        }

        Ok(windows)
    }

    /// Split `dataset` into chronologically ordered partitions.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyDataset`] for a dataset without rows or
    /// without any non-null timestamp, [`ValidationError::MissingField`] when
    /// the timestamp column is absent, and configuration errors from
    /// [`SplitConfig::validate`].
    pub fn split(&self, dataset: &TimeSeriesDataset) -> Result<Vec<Split>> {
        self.config.validate()?;

        let field = self.config.timestamp_field.as_str();
        if dataset.is_empty() {
            return Err(ValidationError::EmptyDataset(
                "cannot split a dataset without rows".to_string(),
            ));
        }
        if !dataset.has_column(field) {
            return Err(ValidationError::MissingField(field.to_string()));
        }

        let stamps = dataset.timestamps(field)?;
        let (start, end) = newsfold_data::dataset::bounds_of(&stamps).ok_or_else(|| {
            ValidationError::EmptyDataset(format!("no timestamps in column {field}"))
        })?;

        let splits = self
            .windows(start, end)?
            .into_iter()
            .enumerate()
            .map(|(fold, (train_window, validation_window))| -> Result<Split> {
                let train = dataset.subset_in(&stamps, &train_window)?;
                let validation = dataset.subset_in(&stamps, &validation_window)?;
                tracing::debug!(
                    fold,
                    train = %train_window,
                    validation = %validation_window,
                    train_rows = train.height(),
                    validation_rows = validation.height(),
                    "built split"
                );
                Ok(Split {
                    fold,
                    train_window,
                    validation_window,
                    train,
                    validation,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            folds = splits.len(),
            %start,
            %end,
            expanding = self.config.expanding,
            "split dataset"
        );
        Ok(splits)
    }
}

/// Split `dataset` on `timestamp_field`.
///
/// `step` is an offset string such as `1y`, `6m` or `4w`; see
/// [`CalendarOffset::parse`].
pub fn split(
    dataset: &TimeSeriesDataset,
    timestamp_field: &str,
    train_size: CalendarOffset,
    val_size: CalendarOffset,
    step: &str,
    expanding: bool,
) -> Result<Vec<Split>> {
    let config = SplitConfig {
        timestamp_field: timestamp_field.to_string(),
        train_size,
        val_size,
        step: CalendarOffset::parse(step)?,
        expanding,
    };
    TimeWindowSplitter::with_config(config).split(dataset)
}
