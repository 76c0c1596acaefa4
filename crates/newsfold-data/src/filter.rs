//! Date-range filtering over half-open intervals.

use crate::dataset::TimeSeriesDataset;
use crate::error::{DataError, Result};
use crate::window::{IntoTimestamp, Window};

/// Rows with `start <= timestamp < end`.
///
/// Timestamps are read from `timestamp_field`. When that column does not
/// exist the dataset's index column is used instead, but only if the index
/// is itself temporal; any other situation is a [`DataError::MissingField`].
///
/// # Errors
///
/// Fails with [`DataError::InvalidDateRange`] when `start > end`, and with
/// the timestamp resolution errors of [`TimeSeriesDataset::timestamps`].
pub fn filter_between<S, E>(
    dataset: &TimeSeriesDataset,
    start: S,
    end: E,
    timestamp_field: &str,
) -> Result<TimeSeriesDataset>
where
    S: IntoTimestamp,
    E: IntoTimestamp,
{
    let window = Window::new(start.into_timestamp()?, end.into_timestamp()?);
    if window.start > window.end {
        return Err(DataError::InvalidDateRange {
            start: window.start.to_string(),
            end: window.end.to_string(),
        });
    }

    let column = resolve_time_column(dataset, timestamp_field)?;
    let stamps = dataset.timestamps(column)?;
    dataset.subset_in(&stamps, &window)
}

/// Pick the column that holds the timestamps for `timestamp_field`.
pub fn resolve_time_column<'a>(
    dataset: &'a TimeSeriesDataset,
    timestamp_field: &'a str,
) -> Result<&'a str> {
    if dataset.has_column(timestamp_field) {
        return Ok(timestamp_field);
    }

    match dataset.index() {
        Some(index) if dataset.is_temporal(index) => {
            tracing::debug!(
                field = timestamp_field,
                index,
                "timestamp field absent, falling back to temporal index"
            );
            Ok(index)
        }
        _ => Err(DataError::MissingField(timestamp_field.to_string())),
    }
}
