//! Crawl orchestration
//!
//! The coordinator owns the browser session, the crawl state, and the loaded
//! progress store, and drives the per-page pipeline: navigate, capture,
//! extract, materialize assets, record. Progress is persisted after every
//! completed page, so a crash or interrupt loses at most the page in flight.

use crate::config::Config;
use crate::crawler::capture::{snapshot_name, Capturer};
use crate::crawler::extract::extract_assets;
use crate::crawler::fetcher::{build_http_client, download};
use crate::crawler::scheduler::{CrawlState, Decision, QueuedPage};
use crate::output::{write_markdown_summary, RunSummary};
use crate::progress::{self, ProgressEntry};
use crate::session::{load_cookies, ChromeSession, PageSession};
use crate::{PorticoError, Result};
use chrono::Utc;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Drives a crawl run over one authenticated session
pub struct Coordinator {
    config: Config,
    session: Box<dyn PageSession>,
    capturer: Capturer,
    client: Client,
    entries: Vec<ProgressEntry>,
    state: CrawlState,
    progress_path: PathBuf,
    shutdown: Arc<AtomicBool>,
}

impl Coordinator {
    /// Loads the progress store and prepares a run.
    ///
    /// A corrupt progress file is fatal here, before any navigation happens.
    pub fn new(config: Config, session: Box<dyn PageSession>) -> Result<Self> {
        let progress_path = PathBuf::from(&config.output.progress_file);
        let entries = progress::load(&progress_path)?;
        info!(
            "Loaded progress store: {} previously captured pages",
            entries.len()
        );

        let state = CrawlState::new(&config.crawler.start_url, progress::visited_links(&entries));
        let capturer = Capturer::new(&config.output);
        let client = build_http_client(&config.fetcher)?;

        Ok(Self {
            config,
            session,
            capturer,
            client,
            entries,
            state,
            progress_path,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag that makes the run loop stop between pages; wired to Ctrl-C by
    /// [`run_crawl`]
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Runs the crawl loop until the frontier drains, the budget is reached,
    /// or shutdown is requested.
    ///
    /// Page failures are logged and absorbed; only progress-persistence
    /// failures propagate out of the loop.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let budget = self.config.crawler.page_budget;
        let start_time = std::time::Instant::now();
        let mut interrupted = false;

        info!(
            start_url = %self.config.crawler.start_url,
            budget,
            "Starting crawl"
        );

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                warn!("Shutdown requested, stopping before next page");
                interrupted = true;
                break;
            }

            if self.state.budget_reached(budget) {
                info!("Page budget of {} reached", budget);
                break;
            }

            let queued = match self.state.next() {
                Some(q) => q,
                None => {
                    info!("Frontier is empty, crawl complete");
                    break;
                }
            };

            match self.state.decide(&queued.url, &self.config.crawler.blocklist) {
                Decision::AlreadyVisited => {
                    debug!(url = %queued.url, "already captured, skipping");
                    continue;
                }
                Decision::Blocklisted(keyword) => {
                    info!(url = %queued.url, keyword, "blocklisted, skipping");
                    self.state.mark_skipped();
                    continue;
                }
                Decision::Visit => {}
            }

            match self.process_page(&queued).await {
                Ok(entry) => {
                    self.state.enqueue_children(
                        &queued.url,
                        &entry.child_pages,
                        &self.config.crawler.base_url,
                    );
                    progress::record(&mut self.entries, entry);
                    progress::save(&self.entries, &self.progress_path)?;
                    self.state.mark_completed(&queued.url);
                }
                Err(e) => {
                    error!(url = %queued.url, error = %e, "page failed, continuing");
                    self.state.mark_failed(&queued.url);
                }
            }
        }

        let counts = self.state.counts();
        let summary = RunSummary {
            completed: counts.completed,
            failed: counts.failed,
            skipped: counts.skipped,
            store_size: self.entries.len() as u64,
            frontier_remaining: self.state.frontier_len() as u64,
            duration_seconds: start_time.elapsed().as_secs(),
            interrupted,
        };

        progress::save(&self.entries, &self.progress_path)?;
        write_markdown_summary(
            &summary,
            &self.config.output,
            Path::new(&self.config.output.summary_path),
        )?;

        info!(
            completed = summary.completed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Crawl finished in {}s",
            summary.duration_seconds
        );

        Ok(summary)
    }

    /// Shuts the browser session down
    pub async fn close(self) -> Result<()> {
        self.session.close().await?;
        Ok(())
    }

    /// Captures one page end to end and builds its progress entry.
    ///
    /// Asset fetches inside the page never fail it; navigation and snapshot
    /// writes do.
    async fn process_page(&mut self, queued: &QueuedPage) -> Result<ProgressEntry> {
        let url = &queued.url;
        info!(url = %url, "visiting");

        self.session.goto(url).await.map_err(|e| PorticoError::Navigation {
            url: url.clone(),
            message: e.to_string(),
        })?;
        self.session
            .wait_for_network_idle()
            .await
            .map_err(|e| PorticoError::Navigation {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let captured = self.capturer.capture_page(self.session.as_mut(), url).await?;

        let page_url = Url::parse(url)?;
        let assets = extract_assets(&captured.html, &page_url);
        debug!(
            url = %url,
            links = assets.links.len(),
            images = assets.images.len(),
            documents = assets.documents.len(),
            "extracted"
        );

        let mut download_list: Vec<String> = self
            .capturer
            .intercept_downloads(self.session.as_mut(), url)
            .await?
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        // Directly linked documents are fetched over HTTP as well; the
        // click-interception above only reaches files behind buttons.
        for doc_url in &assets.documents {
            let filename = asset_filename(doc_url);
            if let Some(path) = download(
                &self.client,
                &self.config.fetcher,
                doc_url,
                self.capturer.download_dir(),
                &filename,
            )
            .await
            {
                download_list.push(path.display().to_string());
            }
        }

        let image_dir = PathBuf::from(&self.config.output.image_dir);
        let mut saved_images_list = Vec::new();
        for image_url in &assets.images {
            let filename = asset_filename(image_url);
            if let Some(path) = download(
                &self.client,
                &self.config.fetcher,
                image_url,
                &image_dir,
                &filename,
            )
            .await
            {
                saved_images_list.push(path.display().to_string());
            }
        }

        Ok(ProgressEntry {
            page_id: progress::next_page_id(&self.entries),
            page_link: url.clone(),
            saved_as_html: captured.html_path.display().to_string(),
            saved_as_pdf: captured.pdf_path.display().to_string(),
            child_pages: assets.links,
            parent_pages: vec![queued.parent.clone()],
            download_list,
            saved_images_list,
            timestamp: Utc::now(),
        })
    }
}

/// Local filename for a fetched asset: the last path segment of its URL,
/// falling back to the full URL-derived name when the path has none
fn asset_filename(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| snapshot_name(url))
}

/// Runs a full crawl: authenticate a browser session, crawl, summarize.
///
/// Session establishment failures (browser launch, cookie replay) are
/// surfaced as authentication errors before any page is visited. Ctrl-C
/// finishes the page in flight, flushes progress and the summary, then
/// exits cleanly.
pub async fn run_crawl(config: Config) -> Result<RunSummary> {
    let cookies = match &config.session.cookies_file {
        Some(path) => load_cookies(Path::new(path))
            .map_err(|e| PorticoError::Authentication(e.to_string()))?,
        None => {
            warn!("No cookies file configured, session starts unauthenticated");
            Vec::new()
        }
    };

    let session = ChromeSession::launch(
        &config.session,
        Path::new(&config.output.download_dir),
        cookies,
    )
    .await
    .map_err(|e| PorticoError::Authentication(e.to_string()))?;

    let mut coordinator = Coordinator::new(config, Box::new(session))?;

    let shutdown = coordinator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current page");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let summary = coordinator.run().await;
    if let Err(e) = coordinator.close().await {
        warn!(error = %e, "session did not close cleanly");
    }

    summary
}
