#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod window;

pub use dataset::{DATE_FIELD, DEFAULT_TIMESTAMP_FIELD, TimeSeriesDataset};
pub use error::{DataError, Result};
pub use filter::{filter_between, resolve_time_column};
pub use loader::{load_news, load_returns, read_csv};
pub use window::{IntoTimestamp, Window, parse_timestamp};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
