#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export main types from sub-crates
pub use newsfold_data as data;
pub use newsfold_output as output;
pub use newsfold_validation as validation;

pub use data::{TimeSeriesDataset, Window, filter_between};
pub use validation::{CalendarOffset, Split, SplitConfig, TimeWindowSplitter, rank_transform};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
