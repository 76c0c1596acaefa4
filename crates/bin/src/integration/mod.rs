//! Glue between the command line and the library crates.
//!
//! Configuration discovery and the load/split/rank/filter stages the
//! subcommands are built from.

pub(crate) mod config;
pub(crate) mod pipeline;
