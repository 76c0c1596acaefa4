//! Integration tests for fold reporting and rank export.

use newsfold_data::TimeSeriesDataset;
use newsfold_output::{ExportFormat, Exporter, FoldReport, FoldSummary, RankedValue};
use newsfold_validation::{SplitConfig, TimeWindowSplitter, rank_transform};
use polars::prelude::*;

fn monthly_news() -> TimeSeriesDataset {
    // first of every month, 2018-01 through 2021-12
    let dates: Vec<String> = (2018..2022)
        .flat_map(|y| (1..=12).map(move |m| format!("{y}-{m:02}-01")))
        .collect();
    let ids: Vec<i64> = (0..dates.len() as i64).collect();

    TimeSeriesDataset::new(
        DataFrame::new(vec![
            Series::new("datetime".into(), dates).into(),
            Series::new("id".into(), ids).into(),
        ])
        .unwrap(),
    )
}

#[test]
fn test_full_split_report_workflow() {
    let config = SplitConfig::default();
    let splits = TimeWindowSplitter::with_config(config.clone())
        .split(&monthly_news())
        .unwrap();

    // 2018-01-01 .. 2021-12-01 leaves room for a single 2y + 1y fold
    assert_eq!(splits.len(), 1);

    let report = FoldReport::from_splits("monthly", config, &splits);
    assert_eq!(report.folds[0].train_rows, 24);
    assert_eq!(report.folds[0].val_rows, 12);

    let ascii = report.to_ascii_table();
    assert!(ascii.contains("2018-01-01 - 2020-01-01"));
    assert!(ascii.contains("2020-01-01 - 2021-01-01"));

    let markdown = report.to_markdown();
    assert!(markdown.contains("| Fold |"));

    let csv = FoldSummary::from_splits(&splits)
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.ends_with(",24,12\n"));
}

#[test]
fn test_rank_export_workflow() {
    let values = [0.02, -0.01, 0.02, 0.05];
    let ranks = rank_transform(&values).unwrap();
    let ranked = RankedValue::zip(&values, &ranks);

    let json = ranked.export_to_string(ExportFormat::Json).unwrap();
    let parsed: Vec<RankedValue> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ranked);
    assert_eq!(parsed[1].rank, 0.0);
    assert_eq!(parsed[3].rank, 1.0);
    assert_eq!(parsed[0].rank, parsed[2].rank);
}
