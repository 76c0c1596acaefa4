#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod offset;
pub mod rank;
pub mod split;

pub use error::{Result, ValidationError};
pub use offset::CalendarOffset;
pub use rank::{rank_column, rank_transform};
pub use split::{Split, SplitConfig, TimeWindowSplitter, split};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
