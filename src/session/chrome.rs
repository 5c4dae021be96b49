//! Headless Chrome session backend
//!
//! Drives a real browser over the Chrome DevTools Protocol. Cookies exported
//! by the external SSO login are replayed into the browser context before
//! the first navigation, and the browser is told to drop file downloads into
//! the crawler's download directory so click-triggered downloads can be
//! picked up from disk.

use crate::config::SessionConfig;
use crate::session::{
    Cookie, ElementHandle, PageSession, PdfOptions, SessionError, SessionResult,
};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

const DOWNLOAD_POLL_INTERVAL: Duration = Duration::from_millis(250);
const NETWORK_SETTLE: Duration = Duration::from_millis(500);

/// Browser session backed by headless Chrome
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
    download_timeout: Duration,
    /// Elements resolved by the last `query_elements` call; invalidated on
    /// navigation
    elements: Vec<Element>,
}

impl ChromeSession {
    /// Launches headless Chrome, points downloads at `download_dir`, and
    /// replays the given cookies into the browser context.
    pub async fn launch(
        config: &SessionConfig,
        download_dir: &Path,
        cookies: Vec<Cookie>,
    ) -> SessionResult<Self> {
        let browser_config = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(SessionError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler_task.abort();
                return Err(SessionError::Launch(e.to_string()));
            }
        };

        let session = Self {
            browser,
            page,
            handler_task,
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
            elements: Vec::new(),
        };

        session.allow_downloads_to(download_dir).await?;
        session.apply_cookies(cookies).await?;

        Ok(session)
    }

    async fn allow_downloads_to(&self, dir: &Path) -> SessionResult<()> {
        std::fs::create_dir_all(dir)?;

        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(dir.to_string_lossy().to_string())
            .build()
            .map_err(SessionError::Protocol)?;

        self.browser
            .execute(params)
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))?;

        Ok(())
    }

    async fn apply_cookies(&self, cookies: Vec<Cookie>) -> SessionResult<()> {
        if cookies.is_empty() {
            return Ok(());
        }

        let params: Vec<CookieParam> = cookies
            .into_iter()
            .map(|cookie| {
                CookieParam::builder()
                    .name(cookie.name)
                    .value(cookie.value)
                    .domain(cookie.domain)
                    .path(cookie.path)
                    .secure(cookie.secure)
                    .http_only(cookie.http_only)
                    .build()
                    .map_err(SessionError::Cookies)
            })
            .collect::<SessionResult<_>>()?;

        self.page
            .set_cookies(params)
            .await
            .map_err(|e| SessionError::Cookies(e.to_string()))?;

        Ok(())
    }

    fn element(&self, handle: ElementHandle) -> SessionResult<&Element> {
        self.elements.get(handle.index()).ok_or_else(|| {
            SessionError::Protocol(format!("stale element handle {}", handle.index()))
        })
    }

    /// Waits for a file that was not present in `before` to finish landing
    /// in `dir`. Chrome writes `.crdownload` files while a transfer is in
    /// flight; the download is done once the final name appears and its size
    /// stops changing.
    async fn wait_for_new_file(
        &self,
        dir: &Path,
        before: &HashSet<PathBuf>,
        label: &str,
    ) -> SessionResult<PathBuf> {
        let deadline = tokio::time::Instant::now() + self.download_timeout;
        let mut last_size: Option<(PathBuf, u64)> = None;

        while tokio::time::Instant::now() < deadline {
            tokio::time::sleep(DOWNLOAD_POLL_INTERVAL).await;

            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if before.contains(&path) {
                    continue;
                }
                if path
                    .extension()
                    .map(|ext| ext == "crdownload" || ext == "tmp")
                    .unwrap_or(false)
                {
                    continue;
                }

                let size = std::fs::metadata(&path)?.len();
                match &last_size {
                    Some((seen, len)) if *seen == path && *len == size => {
                        return Ok(path);
                    }
                    _ => last_size = Some((path, size)),
                }
            }
        }

        Err(SessionError::DownloadTimeout {
            label: label.to_string(),
        })
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn goto(&mut self, url: &str) -> SessionResult<()> {
        self.elements.clear();

        let navigation = self.page.goto(url);
        match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SessionError::Navigation(e.to_string())),
            Err(_) => Err(SessionError::Timeout {
                seconds: self.navigation_timeout.as_secs(),
            }),
        }
    }

    async fn wait_for_network_idle(&mut self) -> SessionResult<()> {
        // Best effort: the page may already be idle by the time we ask.
        let _ = tokio::time::timeout(self.navigation_timeout, self.page.wait_for_navigation())
            .await;
        tokio::time::sleep(NETWORK_SETTLE).await;
        Ok(())
    }

    async fn content(&mut self) -> SessionResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))
    }

    async fn render_pdf(&mut self, path: &Path, options: &PdfOptions) -> SessionResult<()> {
        let params = PrintToPdfParams {
            print_background: Some(options.print_background),
            paper_width: Some(options.paper_width),
            paper_height: Some(options.paper_height),
            margin_top: Some(options.margin),
            margin_bottom: Some(options.margin),
            margin_left: Some(options.margin),
            margin_right: Some(options.margin),
            ..Default::default()
        };

        self.page
            .save_pdf(params, path)
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))?;

        Ok(())
    }

    async fn query_elements(&mut self, selector: &str) -> SessionResult<Vec<ElementHandle>> {
        self.elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))?;

        Ok((0..self.elements.len()).map(ElementHandle::new).collect())
    }

    async fn element_label(&mut self, handle: ElementHandle) -> SessionResult<Option<String>> {
        let element = self.element(handle)?;

        let text = element
            .inner_text()
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if text.is_some() {
            return Ok(text);
        }

        element
            .attribute("aria-label")
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))
    }

    async fn click_for_download(
        &mut self,
        handle: ElementHandle,
        download_dir: &Path,
    ) -> SessionResult<PathBuf> {
        std::fs::create_dir_all(download_dir)?;

        let before: HashSet<PathBuf> = std::fs::read_dir(download_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();

        let label = self
            .element_label(handle)
            .await?
            .unwrap_or_else(|| format!("element #{}", handle.index()));

        self.element(handle)?
            .click()
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))?;

        self.wait_for_new_file(download_dir, &before, &label).await
    }

    async fn close(mut self: Box<Self>) -> SessionResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| SessionError::Protocol(e.to_string()))?;
        self.handler_task.abort();
        Ok(())
    }
}
