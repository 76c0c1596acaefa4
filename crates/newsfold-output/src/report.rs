//! Human-readable reports of a cross-validation run.

use crate::export::FoldSummary;
use chrono::{DateTime, Utc};
use newsfold_validation::{Split, SplitConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fold layout of one splitter run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldReport {
    /// Source of the data, usually a file name.
    pub name: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Splitter configuration the folds were produced with.
    pub config: SplitConfig,

    /// One summary per fold.
    pub folds: Vec<FoldSummary>,
}

impl FoldReport {
    /// Create a report from already summarized folds.
    pub fn new(name: impl Into<String>, config: SplitConfig, folds: Vec<FoldSummary>) -> Self {
        Self {
            name: name.into(),
            timestamp: Utc::now(),
            config,
            folds,
        }
    }

    /// Create a report from splits.
    pub fn from_splits(name: impl Into<String>, config: SplitConfig, splits: &[Split]) -> Self {
        Self::new(name, config, FoldSummary::from_splits(splits))
    }

    const fn mode(&self) -> &'static str {
        if self.config.expanding {
            "expanding"
        } else {
            "sliding"
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nFolds: {}\n", self.name));
        output.push_str(&format!(
            "Mode: {} (train {}, validation {}, step {})\n",
            self.mode(),
            self.config.train_size,
            self.config.val_size,
            self.config.step
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.folds.is_empty() {
            output.push_str("  No fold fits inside the data range.\n");
        } else {
            output.push_str(&format!(
                "{:<6} {:<23} {:<23} {:>12} {:>12}\n",
                "Fold", "Train", "Validation", "Train Rows", "Val Rows"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for fold in &self.folds {
                output.push_str(&format!(
                    "{:<6} {:<23} {:<23} {:>12} {:>12}\n",
                    fold.fold,
                    format!("{} - {}", fold.train_start.date(), fold.train_end.date()),
                    format!("{} - {}", fold.val_start.date(), fold.val_end.date()),
                    fold.train_rows,
                    fold.val_rows
                ));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Folds: {}\n\n", self.name));
        output.push_str(&format!("- **Mode:** {}\n", self.mode()));
        output.push_str(&format!("- **Train size:** {}\n", self.config.train_size));
        output.push_str(&format!("- **Validation size:** {}\n", self.config.val_size));
        output.push_str(&format!("- **Step:** {}\n\n", self.config.step));

        if !self.folds.is_empty() {
            output.push_str(concat!(
                "| Fold | Train Start | Train End | Val Start | Val End ",
                "| Train Rows | Val Rows |\n"
            ));
            output.push_str(concat!(
                "|------|-------------|-----------|-----------|---------",
                "|------------|----------|\n"
            ));

            for fold in &self.folds {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} | {} |\n",
                    fold.fold,
                    fold.train_start,
                    fold.train_end,
                    fold.val_start,
                    fold.val_end,
                    fold.train_rows,
                    fold.val_rows
                ));
            }
        }

        output
    }
}

impl fmt::Display for FoldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {} {} folds", self.name, self.folds.len(), self.mode())?;
        for fold in &self.folds {
            writeln!(
                f,
                "  fold {}: train [{}, {}) validation [{}, {})",
                fold.fold, fold.train_start, fold.train_end, fold.val_start, fold.val_end
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use newsfold_validation::CalendarOffset;

    fn report() -> FoldReport {
        let at = |y| {
            NaiveDate::from_ymd_opt(y, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let folds = vec![
            FoldSummary {
                fold: 0,
                train_start: at(2019),
                train_end: at(2021),
                val_start: at(2021),
                val_end: at(2022),
                train_rows: 731,
                val_rows: 365,
            },
            FoldSummary {
                fold: 1,
                train_start: at(2019),
                train_end: at(2022),
                val_start: at(2022),
                val_end: at(2023),
                train_rows: 1096,
                val_rows: 365,
            },
        ];
        FoldReport::new("news.csv", SplitConfig::default(), folds)
    }

    #[test]
    fn test_ascii_table() {
        let table = report().to_ascii_table();
        assert!(table.contains("Folds: news.csv"));
        assert!(table.contains("Mode: expanding (train 2y, validation 1y, step 1y)"));
        assert!(table.contains("2019-01-01 - 2022-01-01"));
        assert!(table.contains("1096"));
    }

    #[test]
    fn test_empty_ascii_table() {
        let report = FoldReport::new(
            "short.csv",
            SplitConfig {
                expanding: false,
                step: CalendarOffset::months(6),
                ..Default::default()
            },
            Vec::new(),
        );
        let table = report.to_ascii_table();
        assert!(table.contains("sliding"));
        assert!(table.contains("step 6m"));
        assert!(table.contains("No fold fits"));
    }

    #[test]
    fn test_markdown() {
        let markdown = report().to_markdown();
        assert!(markdown.starts_with("# Folds: news.csv\n"));
        assert!(markdown.contains("- **Step:** 1y"));
        assert_eq!(markdown.lines().filter(|l| l.starts_with("| ")).count(), 3);
    }

    #[test]
    fn test_json_keeps_config() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["config"]["train_size"], "2y");
        assert_eq!(value["folds"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_display() {
        let display = report().to_string();
        assert!(display.starts_with("news.csv: 2 expanding folds"));
        assert!(display.contains("fold 1: train [2019-01-01 00:00:00, 2022-01-01 00:00:00)"));
    }
}
