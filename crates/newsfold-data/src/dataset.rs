//! Time-indexed tabular dataset.
//!
//! [`TimeSeriesDataset`] wraps a polars [`DataFrame`] together with an
//! optional index column, the analogue of a row-ordering key. Timestamp
//! columns are resolved on demand from `Date`, `Datetime` or `String`
//! columns; the wrapped frame itself is never modified in place.

use crate::error::{DataError, Result};
use crate::window::{Window, from_epoch, from_epoch_days, parse_timestamp, to_epoch_days};
use chrono::{NaiveDateTime, NaiveTime};
use polars::prelude::*;

/// Default name of the timestamp column.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "datetime";

/// Name of the derived calendar-date column.
pub const DATE_FIELD: &str = "date";

/// A table of rows carrying at least one timestamp-bearing column.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesDataset {
    frame: DataFrame,
    index: Option<String>,
}

impl TimeSeriesDataset {
    /// Wrap a frame with no designated index column.
    pub const fn new(frame: DataFrame) -> Self {
        Self { frame, index: None }
    }

    /// Designate `column` as the dataset's index.
    pub fn with_index(mut self, column: &str) -> Result<Self> {
        if !self.has_column(column) {
            return Err(DataError::MissingField(column.to_string()));
        }
        self.index = Some(column.to_string());
        Ok(self)
    }

    /// Underlying frame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the dataset, returning the frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Index column, if one is designated.
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// True when the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Whether `name` is a column of the dataset.
    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.frame
            .column(name)
            .map_err(|_| DataError::MissingField(name.to_string()))
    }

    /// Whether `name` holds a native temporal dtype (`Date` or `Datetime`).
    pub fn is_temporal(&self, name: &str) -> bool {
        self.frame
            .column(name)
            .is_ok_and(|c| matches!(c.dtype(), DataType::Date | DataType::Datetime(_, _)))
    }

    /// Resolve the timestamps held in `column`, one per row.
    ///
    /// `Date` values map to midnight. Time-zone aware `Datetime` values are
    /// returned in UTC. `String` values are parsed with
    /// [`parse_timestamp`](crate::window::parse_timestamp); blank strings
    /// become `None`, anything unparseable is an error.
    pub fn timestamps(&self, column: &str) -> Result<Vec<Option<NaiveDateTime>>> {
        let values = self.column(column)?;

        match values.dtype() {
            DataType::Date => {
                let days = values.cast(&DataType::Int32)?;
                Ok(days
                    .i32()?
                    .into_iter()
                    .map(|d| d.and_then(from_epoch_days))
                    .collect())
            }
            DataType::Datetime(unit, _) => {
                let unit = *unit;
                let raw = values.cast(&DataType::Int64)?;
                Ok(raw
                    .i64()?
                    .into_iter()
                    .map(|v| v.and_then(|v| from_epoch(v, unit)))
                    .collect())
            }
            DataType::String => values
                .str()?
                .into_iter()
                .map(|v| match v {
                    None => Ok(None),
                    Some(raw) if raw.trim().is_empty() => Ok(None),
                    Some(raw) => {
                        parse_timestamp(raw)
                            .map(Some)
                            .ok_or_else(|| DataError::InvalidTimestamp {
                                column: column.to_string(),
                                value: raw.to_string(),
                            })
                    }
                })
                .collect(),
            other => Err(DataError::NonTemporalColumn {
                column: column.to_string(),
                dtype: other.to_string(),
            }),
        }
    }

    /// Earliest and latest non-null timestamp in `column`.
    pub fn time_bounds(&self, column: &str) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let stamps = self.timestamps(column)?;
        bounds_of(&stamps).ok_or_else(|| {
            DataError::EmptyDataset(format!("no timestamps in column {column}"))
        })
    }

    /// Rows where `mask` is true.
    pub fn mask(&self, mask: &[bool]) -> Result<Self> {
        let mask = BooleanChunked::from_slice("mask".into(), mask);
        Ok(Self {
            frame: self.frame.filter(&mask)?,
            index: self.index.clone(),
        })
    }

    /// Rows whose precomputed timestamp falls inside `window`.
    ///
    /// `stamps` must be the output of [`Self::timestamps`] for this dataset.
    /// Null timestamps never match.
    pub fn subset_in(&self, stamps: &[Option<NaiveDateTime>], window: &Window) -> Result<Self> {
        let mask: Vec<bool> = stamps
            .iter()
            .map(|ts| ts.is_some_and(|ts| window.contains(ts)))
            .collect();
        self.mask(&mask)
    }

    /// Copy of the dataset with `column` converted to `Datetime(ms)`.
    pub fn coerce_timestamps(&self, column: &str) -> Result<Self> {
        let stamps = self.timestamps(column)?;
        self.replace_column(datetime_column(column, &stamps))
    }

    /// Copy of the dataset with `column` truncated to midnight.
    pub fn normalize_to_date(&self, column: &str) -> Result<Self> {
        let stamps: Vec<Option<NaiveDateTime>> = self
            .timestamps(column)?
            .into_iter()
            .map(|ts| ts.map(|ts| ts.date().and_time(NaiveTime::MIN)))
            .collect();
        self.replace_column(datetime_column(column, &stamps))
    }

    /// Copy of the dataset with a `date` column derived from `column`.
    ///
    /// Returns an unchanged copy when a `date` column already exists.
    pub fn with_date_column(&self, column: &str) -> Result<Self> {
        if self.has_column(DATE_FIELD) {
            return Ok(self.clone());
        }
        let stamps = self.timestamps(column)?;
        let days = Int32Chunked::from_iter_options(
            DATE_FIELD.into(),
            stamps.iter().map(|ts| ts.map(to_epoch_days)),
        );
        self.replace_column(days.into_date().into_series().into())
    }

    fn replace_column(&self, column: Column) -> Result<Self> {
        let mut frame = self.frame.clone();
        frame.with_column(column)?;
        Ok(Self {
            frame,
            index: self.index.clone(),
        })
    }
}

impl From<DataFrame> for TimeSeriesDataset {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

/// Earliest and latest of the non-null timestamps.
pub fn bounds_of(stamps: &[Option<NaiveDateTime>]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut present = stamps.iter().flatten().copied();
    let first = present.next()?;
    Some(present.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts))))
}

/// Build a `Datetime(ms)` column from resolved timestamps.
pub(crate) fn datetime_column(name: &str, stamps: &[Option<NaiveDateTime>]) -> Column {
    Int64Chunked::from_iter_options(
        name.into(),
        stamps
            .iter()
            .map(|ts| ts.map(|ts| ts.and_utc().timestamp_millis())),
    )
    .into_datetime(TimeUnit::Milliseconds, None)
    .into_series()
    .into()
}
