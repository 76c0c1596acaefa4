//! CSV loaders for preprocessed news and daily price series.
//!
//! News files hold one article per row with `date`, `text` and `preproc`
//! (space-joined lemmas) columns, one file per year. Price files are MOEX
//! style daily candles with `TRADEDATE`, `CLOSE` and `SECID` columns, one
//! file per security.

use crate::dataset::TimeSeriesDataset;
use crate::error::{DataError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Column holding the article publication date after loading.
pub const ISSUE_DATE_FIELD: &str = "issuedate";

/// Column holding the space-joined preprocessed tokens.
pub const PREPROC_FIELD: &str = "preproc";

/// Trade date column of price files.
pub const TRADE_DATE_FIELD: &str = "TRADEDATE";

/// Forward one-period return column.
pub const RETURN_FIELD: &str = "RET";

const CLOSE_FIELD: &str = "CLOSE";
const SECURITY_FIELD: &str = "SECID";

/// Read a single CSV file with a header row.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<TimeSeriesDataset> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading csv");

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(TimeSeriesDataset::new(frame))
}

/// All `*.csv` files in `dir`, sorted by file name.
pub fn csv_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load and concatenate every news CSV in `dir`.
///
/// Headers are trimmed and lower-cased, `date` is coerced to a timestamp and
/// renamed to [`ISSUE_DATE_FIELD`], and rows without preprocessed text are
/// dropped. The returned dataset is indexed by [`ISSUE_DATE_FIELD`].
pub fn load_news<P: AsRef<Path>>(dir: P) -> Result<TimeSeriesDataset> {
    let dir = dir.as_ref();
    let files = csv_files(dir)?;
    if files.is_empty() {
        return Err(DataError::EmptyDataset(format!(
            "no csv files in {}",
            dir.display()
        )));
    }

    let mut frames = Vec::with_capacity(files.len());
    for file in &files {
        let mut frame = read_csv(file)?.into_frame();
        rename_headers(&mut frame, str::to_lowercase)?;
        frames.push(frame.lazy());
    }
    // columns are matched by name; a column missing from a file is null there
    let combined = concat_lf_diagonal(
        frames,
        UnionArgs {
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .collect()?;

    for required in ["date", PREPROC_FIELD] {
        if combined.get_column_index(required).is_none() {
            return Err(DataError::MissingField(required.to_string()));
        }
    }

    let preproc = combined.column(PREPROC_FIELD)?.cast(&DataType::String)?;
    let keep: Vec<bool> = preproc
        .str()?
        .into_iter()
        .map(|v| v.is_some_and(|s| !s.trim().is_empty()))
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        tracing::debug!(dropped, "dropping articles without preprocessed text");
    }

    let dataset = TimeSeriesDataset::new(combined)
        .mask(&keep)?
        .coerce_timestamps("date")?;
    let mut frame = dataset.into_frame();
    frame.rename("date", ISSUE_DATE_FIELD.into())?;

    tracing::info!(
        files = files.len(),
        articles = frame.height(),
        "loaded news"
    );
    TimeSeriesDataset::new(frame).with_index(ISSUE_DATE_FIELD)
}

/// Split the `preproc` column of a news dataset into token lists.
///
/// Null entries yield an empty list.
pub fn news_tokens(dataset: &TimeSeriesDataset) -> Result<Vec<Vec<String>>> {
    let preproc = dataset
        .frame()
        .column(PREPROC_FIELD)
        .map_err(|_| DataError::MissingField(PREPROC_FIELD.to_string()))?
        .cast(&DataType::String)?;

    Ok(preproc
        .str()?
        .into_iter()
        .map(|v| {
            v.map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        })
        .collect())
}

/// Load forward returns for every price CSV in `dir`, keyed by security id.
///
/// Each series is sorted by [`TRADE_DATE_FIELD`] and carries
/// `RET[t] = CLOSE[t+1] / CLOSE[t] - 1`; the last row of each file has no
/// forward return and is dropped.
pub fn load_returns<P: AsRef<Path>>(dir: P) -> Result<BTreeMap<String, TimeSeriesDataset>> {
    let mut returns = BTreeMap::new();

    for file in csv_files(dir)? {
        let mut frame = read_csv(&file)?.into_frame();
        rename_headers(&mut frame, str::to_uppercase)?;

        for required in [TRADE_DATE_FIELD, CLOSE_FIELD, SECURITY_FIELD] {
            if frame.get_column_index(required).is_none() {
                return Err(DataError::MissingField(format!(
                    "{required} in {}",
                    file.display()
                )));
            }
        }

        if frame.height() == 0 {
            tracing::warn!(path = %file.display(), "skipping price file without rows");
            continue;
        }
        let security = frame.column(SECURITY_FIELD)?.cast(&DataType::String)?;
        let Some(security) = security.str()?.get(0).map(str::to_string) else {
            tracing::warn!(path = %file.display(), "skipping price file without a security id");
            continue;
        };

        let series = forward_returns(TimeSeriesDataset::new(frame))?;
        if returns.insert(security.clone(), series).is_some() {
            tracing::warn!(security = %security, "duplicate security id, keeping the later file");
        }
    }

    tracing::info!(securities = returns.len(), "loaded returns");
    Ok(returns)
}

/// Sort a price series by trade date and attach forward returns.
pub fn forward_returns(prices: TimeSeriesDataset) -> Result<TimeSeriesDataset> {
    let frame = prices
        .coerce_timestamps(TRADE_DATE_FIELD)?
        .into_frame()
        .lazy()
        .sort([TRADE_DATE_FIELD], SortMultipleOptions::default())
        .with_column(col(CLOSE_FIELD).cast(DataType::Float64))
        .with_column(
            (col(CLOSE_FIELD).shift(lit(-1i64)) / col(CLOSE_FIELD) - lit(1.0)).alias(RETURN_FIELD),
        )
        .filter(col(RETURN_FIELD).is_not_null())
        .select([col(TRADE_DATE_FIELD), col(RETURN_FIELD)])
        .collect()?;

    TimeSeriesDataset::new(frame).with_index(TRADE_DATE_FIELD)
}

fn rename_headers(frame: &mut DataFrame, case: fn(&str) -> String) -> Result<()> {
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| case(name.trim()))
        .collect();
    frame.set_column_names(names)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use std::fs;

    #[test]
    fn test_forward_returns_sorted_and_shifted() {
        let frame = DataFrame::new(vec![
            Series::new("TRADEDATE".into(), vec!["2022-01-05", "2022-01-03", "2022-01-04"]).into(),
            Series::new("CLOSE".into(), vec![121.0, 100.0, 110.0]).into(),
        ])
        .unwrap();

        let series = forward_returns(TimeSeriesDataset::new(frame)).unwrap();
        assert_eq!(series.height(), 2);
        assert_eq!(series.index(), Some(TRADE_DATE_FIELD));

        let dates = series.timestamps(TRADE_DATE_FIELD).unwrap();
        let jan3 = NaiveDate::from_ymd_opt(2022, 1, 3)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(dates[0], Some(jan3));

        let rets: Vec<f64> = series
            .frame()
            .column(RETURN_FIELD)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert!((rets[0] - 0.1).abs() < 1e-12);
        assert!((rets[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_news_tokens_split_on_whitespace() {
        let frame = DataFrame::new(vec![
            Series::new("preproc".into(), vec![Some("рынок  нефть"), None]).into(),
        ])
        .unwrap();

        let tokens = news_tokens(&TimeSeriesDataset::new(frame)).unwrap();
        assert_eq!(tokens[0], vec!["рынок".to_string(), "нефть".to_string()]);
        assert!(tokens[1].is_empty());
    }

    #[test]
    fn test_csv_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2022.csv"), "a\n1\n").unwrap();
        fs::write(dir.path().join("2021.csv"), "a\n1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let files = csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2021.csv", "2022.csv"]);
    }

    #[test]
    fn test_load_news_requires_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_news(dir.path()),
            Err(DataError::EmptyDataset(_))
        ));
    }
}
