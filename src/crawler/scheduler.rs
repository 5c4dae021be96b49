//! Frontier scheduling and visit bookkeeping
//!
//! The crawl is a breadth-first walk over a FIFO frontier. Every URL popped
//! from the frontier goes through one decision: visit it, skip it because it
//! was already captured (this run or a previous one), or skip it because it
//! matches a blocklist keyword. The start URL is the exception: it is
//! always re-crawled once per run so resumed crawls refresh their entry
//! point.

use std::collections::{HashSet, VecDeque};

/// A URL waiting in the frontier, with the page that discovered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPage {
    pub url: String,
    pub parent: String,
}

/// Outcome of the pop-time decision for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Visit,
    AlreadyVisited,
    Blocklisted(String),
}

/// Per-run counters, reported in the final summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitCounts {
    pub completed: u64,
    pub failed: u64,
    pub skipped: u64,
}

/// Explicit crawl state owned by the coordinator.
///
/// Replaces the process-wide visited/summary globals of ad-hoc scrapers: all
/// mutation goes through this value and nothing survives the run except what
/// the progress store persists.
#[derive(Debug)]
pub struct CrawlState {
    frontier: VecDeque<QueuedPage>,
    visited: HashSet<String>,
    start_url: String,
    start_visited_this_run: bool,
    counts: VisitCounts,
}

impl CrawlState {
    /// Seeds the frontier with the start URL and the visited set with the
    /// links captured by previous runs.
    pub fn new(start_url: &str, previously_visited: HashSet<String>) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(QueuedPage {
            url: start_url.to_string(),
            parent: start_url.to_string(),
        });

        Self {
            frontier,
            visited: previously_visited,
            start_url: start_url.to_string(),
            start_visited_this_run: false,
            counts: VisitCounts::default(),
        }
    }

    /// Pops the next URL in FIFO order
    pub fn next(&mut self) -> Option<QueuedPage> {
        self.frontier.pop_front()
    }

    /// Decides what to do with a popped URL.
    ///
    /// The start URL is processed even when the visited set already holds it
    /// (resume semantics), but only once per run. Blocklist matching is a
    /// case-insensitive substring test.
    pub fn decide(&self, url: &str, blocklist: &[String]) -> Decision {
        if url == self.start_url && !self.start_visited_this_run {
            return Decision::Visit;
        }

        if self.visited.contains(url) {
            return Decision::AlreadyVisited;
        }

        let lowered = url.to_lowercase();
        for keyword in blocklist {
            if lowered.contains(&keyword.to_lowercase()) {
                return Decision::Blocklisted(keyword.clone());
            }
        }

        Decision::Visit
    }

    /// Marks a page as captured and counts it against the budget
    pub fn mark_completed(&mut self, url: &str) {
        if url == self.start_url {
            self.start_visited_this_run = true;
        }
        self.visited.insert(url.to_string());
        self.counts.completed += 1;
    }

    /// Marks a page as failed. Failed URLs join the visited set so they are
    /// not retried within this run; they are retried by the next run because
    /// only completed pages reach the progress store.
    pub fn mark_failed(&mut self, url: &str) {
        if url == self.start_url {
            self.start_visited_this_run = true;
        }
        self.visited.insert(url.to_string());
        self.counts.failed += 1;
    }

    pub fn mark_skipped(&mut self) {
        self.counts.skipped += 1;
    }

    /// Appends child links to the back of the frontier (breadth-first).
    ///
    /// Only links under `base_url` are enqueued, and never ones already in
    /// the visited set. Returns how many were added.
    pub fn enqueue_children(&mut self, parent: &str, links: &[String], base_url: &str) -> usize {
        let mut added = 0;
        for link in links {
            if link.starts_with(base_url) && !self.visited.contains(link) {
                self.frontier.push_back(QueuedPage {
                    url: link.clone(),
                    parent: parent.to_string(),
                });
                added += 1;
            }
        }
        added
    }

    /// True once this run's completed count reaches the budget; a budget of
    /// zero never stops the crawl.
    pub fn budget_reached(&self, budget: u64) -> bool {
        budget != 0 && self.counts.completed >= budget
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn counts(&self) -> VisitCounts {
        self.counts
    }
}
