//! Normalized rank targets.
//!
//! Values are ranked 1..=n with ties sharing the mean of the ranks they
//! span, then mapped to `(rank - 1) / (n - 1)` so the smallest value lands
//! on 0 and the largest on 1.

use crate::error::{Result, ValidationError};
use newsfold_data::TimeSeriesDataset;
use polars::prelude::*;

const VALUES: &str = "values";

/// Map `values` to normalized average ranks in `[0, 1]`.
///
/// # Errors
///
/// [`ValidationError::InsufficientData`] for fewer than two values, since
/// `n - 1` would be zero, and [`ValidationError::NonFiniteValue`] for NaN,
/// which has no position in the ordering.
pub fn rank_transform(values: &[f64]) -> Result<Vec<f64>> {
    let n = values.len();
    if n <= 1 {
        return Err(ValidationError::InsufficientData { len: n });
    }
    if let Some(index) = values.iter().position(|v| v.is_nan()) {
        return Err(ValidationError::NonFiniteValue { index });
    }

    let frame = DataFrame::new(vec![Series::new(VALUES.into(), values).into()])?;
    let ranked = frame
        .lazy()
        .select([((col(VALUES).rank(
            RankOptions {
                method: RankMethod::Average,
                descending: false,
            },
            None,
        ) - lit(1.0))
            / lit((n - 1) as f64))
        .alias(VALUES)])
        .collect()?;

    Ok(ranked
        .column(VALUES)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_no_null_iter()
        .collect())
}

/// Rank a numeric column of `dataset`.
///
/// # Errors
///
/// [`ValidationError::MissingField`] when the column is absent,
/// [`ValidationError::NonFiniteValue`] for null or NaN entries,
/// [`ValidationError::Polars`] when the column is not numeric, plus the
/// errors of [`rank_transform`].
pub fn rank_column(dataset: &TimeSeriesDataset, column: &str) -> Result<Vec<f64>> {
    let values = dataset
        .frame()
        .column(column)
        .map_err(|_| ValidationError::MissingField(column.to_string()))?
        .strict_cast(&DataType::Float64)?;

    let values = values
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(index, v)| v.ok_or(ValidationError::NonFiniteValue { index }))
        .collect::<Result<Vec<_>>>()?;

    rank_transform(&values)
}
