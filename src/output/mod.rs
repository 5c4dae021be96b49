//! Run reporting
//!
//! End-of-run summaries: counters printed to the terminal, a markdown file
//! written next to the other artifacts, and store statistics for the
//! `--stats` mode.

mod markdown;
mod stats;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use stats::{load_statistics, print_run_summary, print_statistics, RunSummary, StoreStatistics};
