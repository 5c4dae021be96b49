//! Crawl engine
//!
//! The coordinator drives the run; the scheduler owns the frontier and
//! visit decisions; capture, extract, and fetcher each handle one stage of
//! the per-page pipeline.

mod capture;
mod coordinator;
mod extract;
mod fetcher;
mod scheduler;

pub use capture::{snapshot_name, Capturer};
pub use coordinator::{run_crawl, Coordinator};
pub use extract::{extract_assets, is_document_link, is_document_name, PageAssets};
pub use fetcher::{build_http_client, download};
pub use scheduler::{CrawlState, Decision, QueuedPage, VisitCounts};
