//! Shared test fixtures: an in-memory session backend and config builders
#![allow(dead_code)]

use async_trait::async_trait;
use portico::config::{
    Config, CrawlerConfig, FetcherConfig, OutputConfig, SessionConfig,
};
use portico::session::{ElementHandle, PageSession, PdfOptions, SessionError, SessionResult};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One fake page: markup plus the labels of its download buttons
#[derive(Debug, Clone, Default)]
struct StubPage {
    html: String,
    buttons: Vec<String>,
}

/// In-memory [`PageSession`] backed by a map of URL → page.
///
/// Navigations are recorded in a shared log so tests can assert on visit
/// order; clicking a download button writes a small file named after the
/// button's label into the download directory.
pub struct StubSession {
    site: HashMap<String, StubPage>,
    fail_on: HashSet<String>,
    current: Option<String>,
    visit_log: Arc<Mutex<Vec<String>>>,
}

impl StubSession {
    pub fn new() -> Self {
        Self {
            site: HashMap::new(),
            fail_on: HashSet::new(),
            current: None,
            visit_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_page(&mut self, url: &str, html: &str) {
        self.site
            .entry(url.to_string())
            .or_default()
            .html = html.to_string();
    }

    pub fn add_download_button(&mut self, url: &str, label: &str) {
        self.site
            .entry(url.to_string())
            .or_default()
            .buttons
            .push(label.to_string());
    }

    /// Makes every navigation to `url` fail
    pub fn fail_navigation(&mut self, url: &str) {
        self.fail_on.insert(url.to_string());
    }

    /// Shared handle to the ordered list of navigated URLs
    pub fn visit_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.visit_log.clone()
    }

    fn current_page(&self) -> SessionResult<&StubPage> {
        self.current
            .as_ref()
            .and_then(|url| self.site.get(url))
            .ok_or_else(|| SessionError::Protocol("no page loaded".to_string()))
    }
}

#[async_trait]
impl PageSession for StubSession {
    async fn goto(&mut self, url: &str) -> SessionResult<()> {
        self.visit_log.lock().unwrap().push(url.to_string());

        if self.fail_on.contains(url) {
            self.current = None;
            return Err(SessionError::Navigation(format!("refused: {}", url)));
        }
        if !self.site.contains_key(url) {
            self.current = None;
            return Err(SessionError::Navigation(format!("no such page: {}", url)));
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_network_idle(&mut self) -> SessionResult<()> {
        Ok(())
    }

    async fn content(&mut self) -> SessionResult<String> {
        Ok(self.current_page()?.html.clone())
    }

    async fn render_pdf(&mut self, path: &Path, _options: &PdfOptions) -> SessionResult<()> {
        self.current_page()?;
        std::fs::write(path, b"%PDF-1.4 stub render")?;
        Ok(())
    }

    async fn query_elements(&mut self, _selector: &str) -> SessionResult<Vec<ElementHandle>> {
        let count = self.current_page()?.buttons.len();
        Ok((0..count).map(ElementHandle::new).collect())
    }

    async fn element_label(&mut self, handle: ElementHandle) -> SessionResult<Option<String>> {
        Ok(self.current_page()?.buttons.get(handle.index()).cloned())
    }

    async fn click_for_download(
        &mut self,
        handle: ElementHandle,
        download_dir: &Path,
    ) -> SessionResult<PathBuf> {
        let label = self
            .current_page()?
            .buttons
            .get(handle.index())
            .cloned()
            .ok_or_else(|| SessionError::Protocol("stale handle".to_string()))?;

        std::fs::create_dir_all(download_dir)?;
        let path = download_dir.join(&label);
        std::fs::write(&path, b"stub download bytes")?;
        Ok(path)
    }

    async fn close(self: Box<Self>) -> SessionResult<()> {
        Ok(())
    }
}

/// Config rooted under a temp directory, with instant fetcher retries
pub fn test_config(root: &Path, start_url: &str, base_url: &str, page_budget: u64) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url: start_url.to_string(),
            base_url: base_url.to_string(),
            page_budget,
            blocklist: vec![
                "signout".to_string(),
                "logout".to_string(),
                "print".to_string(),
            ],
        },
        session: SessionConfig {
            cookies_file: None,
            navigation_timeout_secs: 5,
            download_timeout_secs: 5,
        },
        fetcher: FetcherConfig {
            max_attempts: 1,
            backoff_base: 0.0,
            timeout_secs: 2,
            user_agent: "portico-test".to_string(),
        },
        output: OutputConfig {
            pages_dir: root.join("pages").display().to_string(),
            pdf_dir: root.join("pdf").display().to_string(),
            download_dir: root.join("downloads").display().to_string(),
            image_dir: root.join("images").display().to_string(),
            progress_file: root.join("progress_summary.json").display().to_string(),
            summary_path: root.join("summary.md").display().to_string(),
        },
    }
}
