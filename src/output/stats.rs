//! Run and store statistics

use crate::progress::ProgressEntry;

/// Counters for one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages captured this run
    pub completed: u64,
    /// Pages that failed navigation or capture
    pub failed: u64,
    /// Pages skipped by the blocklist
    pub skipped: u64,
    /// Total entries now in the progress store
    pub store_size: u64,
    /// URLs still queued when the run stopped
    pub frontier_remaining: u64,
    pub duration_seconds: u64,
    /// True when the run stopped on an operator interrupt
    pub interrupted: bool,
}

/// Aggregates over the whole progress store, for `--stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatistics {
    pub total_pages: u64,
    pub total_links: u64,
    pub total_downloads: u64,
    pub total_images: u64,
}

pub fn load_statistics(entries: &[ProgressEntry]) -> StoreStatistics {
    StoreStatistics {
        total_pages: entries.len() as u64,
        total_links: entries.iter().map(|e| e.child_pages.len() as u64).sum(),
        total_downloads: entries.iter().map(|e| e.download_list.len() as u64).sum(),
        total_images: entries
            .iter()
            .map(|e| e.saved_images_list.len() as u64)
            .sum(),
    }
}

/// Prints the end-of-run summary to stdout
pub fn print_run_summary(summary: &RunSummary) {
    println!("=== Crawl Summary ===\n");
    if summary.interrupted {
        println!("Run interrupted; progress was flushed.\n");
    }
    println!("  Completed: {}", summary.completed);
    println!("  Failed:    {}", summary.failed);
    println!("  Skipped:   {}", summary.skipped);
    println!();
    println!("  Progress store now holds {} pages", summary.store_size);
    println!("  {} URLs left in the frontier", summary.frontier_remaining);
    println!("  Duration: {}s", summary.duration_seconds);
}

/// Prints store-wide statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Progress Store Statistics ===\n");
    println!("  Captured pages:   {}", stats.total_pages);
    println!("  Links discovered: {}", stats.total_links);
    println!("  Files downloaded: {}", stats.total_downloads);
    println!("  Images saved:     {}", stats.total_images);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_load_statistics() {
        let entries = vec![
            ProgressEntry {
                page_id: 1,
                page_link: "https://example.com/a".to_string(),
                saved_as_html: "./pages/a.html".to_string(),
                saved_as_pdf: "./pdf/a.pdf".to_string(),
                child_pages: vec!["x".into(), "y".into()],
                parent_pages: vec![],
                download_list: vec!["d.pdf".into()],
                saved_images_list: vec!["i.png".into(), "j.png".into(), "k.png".into()],
                timestamp: Utc::now(),
            },
            ProgressEntry {
                page_id: 2,
                page_link: "https://example.com/b".to_string(),
                saved_as_html: "./pages/b.html".to_string(),
                saved_as_pdf: "./pdf/b.pdf".to_string(),
                child_pages: vec!["z".into()],
                parent_pages: vec![],
                download_list: vec![],
                saved_images_list: vec![],
                timestamp: Utc::now(),
            },
        ];

        let stats = load_statistics(&entries);
        assert_eq!(stats.total_pages, 2);
        assert_eq!(stats.total_links, 3);
        assert_eq!(stats.total_downloads, 1);
        assert_eq!(stats.total_images, 3);
    }
}
