use crate::{PorticoError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One record per successfully captured page.
///
/// Field names are the on-disk JSON names; progress files from earlier runs
/// must keep loading, so do not rename them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Unique, increasing within one store; not contiguous across runs
    pub page_id: u64,

    /// Canonical URL of the captured page; unique across the store
    pub page_link: String,

    /// Where the HTML snapshot was written
    pub saved_as_html: String,

    /// Where the PDF render was written
    pub saved_as_pdf: String,

    /// Every link discovered on the page, in document order, duplicates kept
    pub child_pages: Vec<String>,

    /// URLs that led the crawler here; accumulated across re-crawls, not
    /// deduplicated
    pub parent_pages: Vec<String>,

    /// Local paths of files materialized from in-page downloads
    pub download_list: Vec<String>,

    /// Local paths of images fetched from the page
    pub saved_images_list: Vec<String>,

    /// Set once at capture time, never mutated
    pub timestamp: DateTime<Utc>,
}

/// Loads the progress file.
///
/// A missing file is a fresh start and yields an empty sequence. A file that
/// exists but does not parse is surfaced as [`PorticoError::CorruptProgress`]
/// rather than swallowed: silently starting over would duplicate the whole
/// crawl and lose provenance.
pub fn load(path: &Path) -> Result<Vec<ProgressEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| PorticoError::CorruptProgress {
        path: path.to_path_buf(),
        source,
    })
}

/// Persists the full entry sequence, replacing the file atomically.
///
/// Writes to a sibling temp file first and renames over the destination so a
/// crash mid-write cannot leave a truncated progress file behind.
pub fn save(entries: &[ProgressEntry], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(entries)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Next page identifier: 1 for an empty store, otherwise max + 1
pub fn next_page_id(entries: &[ProgressEntry]) -> u64 {
    entries.iter().map(|e| e.page_id).max().map_or(1, |m| m + 1)
}

/// Records an entry, keyed by `page_link`.
///
/// A re-crawled URL replaces its previous record rather than merging with
/// it; the one exception is provenance, where the replacement keeps the old
/// entry's parents in front of its own.
pub fn record(entries: &mut Vec<ProgressEntry>, mut entry: ProgressEntry) {
    if let Some(pos) = entries.iter().position(|e| e.page_link == entry.page_link) {
        let old = entries.remove(pos);
        let mut parents = old.parent_pages;
        parents.append(&mut entry.parent_pages);
        entry.parent_pages = parents;
    }
    entries.push(entry);
}

/// The set of URLs already captured, for seeding the scheduler's visited set
pub fn visited_links(entries: &[ProgressEntry]) -> HashSet<String> {
    entries.iter().map(|e| e.page_link.clone()).collect()
}
