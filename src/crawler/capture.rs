//! Page artifact capture
//!
//! For every visited page the capturer persists two renderings, the live
//! DOM as an HTML snapshot and a print-style paginated PDF, and walks the
//! page's interactive elements to trigger any download buttons it finds.
//! Filenames are derived from the URL so re-captures overwrite their
//! previous artifacts instead of piling up.

use crate::config::OutputConfig;
use crate::crawler::extract::is_document_name;
use crate::session::{PageSession, PdfOptions};
use crate::{PorticoError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Elements that can carry a download action
const CLICKABLE_SELECTOR: &str = "a, button";

/// Derives a filesystem-safe name from a URL.
///
/// `/` and `:` become `_`; the mapping is deterministic so a re-crawled page
/// lands on the same files.
pub fn snapshot_name(url: &str) -> String {
    url.replace(['/', ':'], "_")
}

/// Artifacts produced by capturing one page
#[derive(Debug)]
pub struct CapturedPage {
    /// Rendered markup, kept in memory for extraction
    pub html: String,
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
}

/// Writes page renderings and intercepts in-page downloads
pub struct Capturer {
    pages_dir: PathBuf,
    pdf_dir: PathBuf,
    download_dir: PathBuf,
    pdf_options: PdfOptions,
}

impl Capturer {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            pages_dir: PathBuf::from(&output.pages_dir),
            pdf_dir: PathBuf::from(&output.pdf_dir),
            download_dir: PathBuf::from(&output.download_dir),
            pdf_options: PdfOptions::default(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Persists the current page as HTML and PDF.
    ///
    /// Either write failing fails the whole page: a progress entry with a
    /// missing snapshot would claim work that was not done.
    pub async fn capture_page(
        &self,
        session: &mut dyn PageSession,
        url: &str,
    ) -> Result<CapturedPage> {
        let name = snapshot_name(url);

        let html = session
            .content()
            .await
            .map_err(|e| capture_error(url, &e))?;

        std::fs::create_dir_all(&self.pages_dir)?;
        let html_path = self.pages_dir.join(format!("{}.html", name));
        std::fs::write(&html_path, &html)?;

        std::fs::create_dir_all(&self.pdf_dir)?;
        let pdf_path = self.pdf_dir.join(format!("{}.pdf", name));
        session
            .render_pdf(&pdf_path, &self.pdf_options)
            .await
            .map_err(|e| capture_error(url, &e))?;

        debug!(url, html = %html_path.display(), pdf = %pdf_path.display(), "page captured");

        Ok(CapturedPage {
            html,
            html_path,
            pdf_path,
        })
    }

    /// Clicks every element whose label names a document file and collects
    /// the files the clicks drop into the download directory.
    ///
    /// A single element failing (stale handle, click that navigates away,
    /// download that never lands) is logged and skipped; the rest of the
    /// page's downloads still happen.
    pub async fn intercept_downloads(
        &self,
        session: &mut dyn PageSession,
        url: &str,
    ) -> Result<Vec<PathBuf>> {
        let handles = session
            .query_elements(CLICKABLE_SELECTOR)
            .await
            .map_err(|e| capture_error(url, &e))?;

        let mut saved = Vec::new();
        for handle in handles {
            let label = match session.element_label(handle).await {
                Ok(Some(label)) => label,
                Ok(None) => continue,
                Err(e) => {
                    warn!(url, error = %e, "could not read element label");
                    continue;
                }
            };

            if !is_document_name(&label) {
                continue;
            }

            match session.click_for_download(handle, &self.download_dir).await {
                Ok(path) => {
                    debug!(url, label, path = %path.display(), "download intercepted");
                    saved.push(path);
                }
                Err(e) => {
                    warn!(url, label, error = %e, "download failed");
                }
            }
        }

        Ok(saved)
    }
}

fn capture_error(url: &str, source: &dyn std::fmt::Display) -> PorticoError {
    PorticoError::Capture {
        url: url.to_string(),
        message: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_name_replaces_separators() {
        assert_eq!(
            snapshot_name("https://portal.example.com/brand/colors"),
            "https___portal.example.com_brand_colors"
        );
    }

    #[test]
    fn test_snapshot_name_is_deterministic() {
        let url = "https://portal.example.com/a?q=1";
        assert_eq!(snapshot_name(url), snapshot_name(url));
    }
}
