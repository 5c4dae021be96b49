//! Durable crawl progress
//!
//! The progress file is the crawler's only persistent state: an ordered JSON
//! array of one record per captured page. It is loaded at startup to rebuild
//! the visited set and rewritten after every completed page, so a crash
//! loses at most the page that was in flight.

mod store;

pub use store::{load, next_page_id, record, save, visited_links, ProgressEntry};
