//! newsfold CLI binary.
//!
//! Splits time-indexed CSV data into cross-validation folds, computes
//! normalized rank targets and filters rows by date range.

mod integration;

use clap::{Parser, Subcommand};
use integration::config::{SplitOverrides, load_split_config};
use integration::pipeline::{self, OutputFormat};
use newsfold_data::DEFAULT_TIMESTAMP_FIELD;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "newsfold")]
#[command(about = "Time-series cross-validation for news-driven return models", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a CSV file into train/validation folds
    Split {
        /// Input CSV file
        input: PathBuf,

        /// Timestamp column
        #[arg(long)]
        column: Option<String>,

        /// Initial training window, e.g. 2y
        #[arg(long)]
        train: Option<String>,

        /// Validation window, e.g. 1y
        #[arg(long)]
        val: Option<String>,

        /// Step between folds, e.g. 6m
        #[arg(long)]
        step: Option<String>,

        /// Slide the training window instead of growing it
        #[arg(long)]
        sliding: bool,

        /// JSON splitter configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Normalized average ranks of a numeric column
    Rank {
        /// Input CSV file
        input: PathBuf,

        /// Column to rank
        #[arg(long)]
        column: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Keep rows whose timestamp lies in [start, end)
    Filter {
        /// Input CSV file
        input: PathBuf,

        /// Inclusive lower bound, e.g. 2021-01-01
        #[arg(long)]
        start: String,

        /// Exclusive upper bound
        #[arg(long)]
        end: String,

        /// Timestamp column
        #[arg(long, default_value = DEFAULT_TIMESTAMP_FIELD)]
        column: String,

        /// Output CSV file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "newsfold=info".into()))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            input,
            column,
            train,
            val,
            step,
            sliding,
            config,
            format,
        } => {
            let overrides = SplitOverrides {
                column,
                train,
                val,
                step,
                sliding,
            };
            let config = overrides.apply(load_split_config(config.as_deref())?)?;
            let dataset = pipeline::load(&input)?;
            let report = pipeline::split(&dataset, &config, &display_name(&input))?;
            print!("{}", pipeline::render_split(&report, format)?);
        }
        Commands::Rank {
            input,
            column,
            format,
        } => {
            let dataset = pipeline::load(&input)?;
            let ranked = pipeline::rank(&dataset, &column)?;
            print!("{}", pipeline::render_rank(&ranked, format)?);
        }
        Commands::Filter {
            input,
            start,
            end,
            column,
            output,
        } => {
            let dataset = pipeline::load(&input)?;
            let filtered = pipeline::filter(&dataset, &start, &end, &column)?;
            pipeline::write_csv(&filtered, output.as_deref(), &mut std::io::stdout().lock())?;
        }
    }

    Ok(())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_split() {
        let cli = Cli::try_parse_from([
            "newsfold", "split", "news.csv", "--step", "6m", "--sliding", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Split {
                step,
                sliding,
                format,
                column,
                ..
            } => {
                assert_eq!(step.as_deref(), Some("6m"));
                assert!(sliding);
                assert_eq!(format, OutputFormat::Json);
                assert!(column.is_none());
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_filter_defaults_to_datetime_column() {
        let cli = Cli::try_parse_from([
            "newsfold", "filter", "news.csv", "--start", "2021-01-01", "--end", "2022-01-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Filter { column, output, .. } => {
                assert_eq!(column, "datetime");
                assert!(output.is_none());
            }
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn test_rank_requires_column() {
        assert!(Cli::try_parse_from(["newsfold", "rank", "x.csv"]).is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(std::path::Path::new("data/news.csv")), "news.csv");
    }
}
