//! Browser session abstraction
//!
//! The crawler drives an authenticated browsing session through the
//! [`PageSession`] trait: navigate, read rendered markup, render a
//! print-style PDF, and click in-page elements while intercepting the file
//! downloads they trigger. The production backend runs headless Chrome over
//! CDP; tests substitute an in-memory stub.

mod chrome;
mod cookies;

pub use chrome::ChromeSession;
pub use cookies::{load_cookies, Cookie};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by session backends
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to apply cookies: {0}")]
    Cookies(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Navigation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Browser protocol error: {0}")]
    Protocol(String),

    #[error("Download did not complete for element '{label}'")]
    DownloadTimeout { label: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Opaque reference to an element found on the current page.
///
/// Handles are valid until the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Print rendering options for PDF capture
#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Paper width in inches
    pub paper_width: f64,
    /// Paper height in inches
    pub paper_height: f64,
    /// Uniform margin in inches
    pub margin: f64,
    /// Whether to print CSS backgrounds
    pub print_background: bool,
}

impl Default for PdfOptions {
    // A4 portrait with half-inch margins
    fn default() -> Self {
        Self {
            paper_width: 8.27,
            paper_height: 11.69,
            margin: 0.5,
            print_background: true,
        }
    }
}

/// Capability set the crawler needs from a browser session.
///
/// Implementations hold the authenticated state; the crawler never sees
/// cookies or the underlying automation product.
#[async_trait]
pub trait PageSession: Send {
    /// Navigates to the given URL
    async fn goto(&mut self, url: &str) -> SessionResult<()>;

    /// Waits until in-flight network activity on the current page settles
    async fn wait_for_network_idle(&mut self) -> SessionResult<()>;

    /// Returns the rendered markup of the current page
    async fn content(&mut self) -> SessionResult<String>;

    /// Renders the current page to a paginated PDF at `path`
    async fn render_pdf(&mut self, path: &Path, options: &PdfOptions) -> SessionResult<()>;

    /// Finds elements on the current page matching a CSS selector
    async fn query_elements(&mut self, selector: &str) -> SessionResult<Vec<ElementHandle>>;

    /// Returns the visible text of an element, falling back to its
    /// `aria-label` attribute
    async fn element_label(&mut self, handle: ElementHandle) -> SessionResult<Option<String>>;

    /// Clicks an element and waits for the file download it triggers,
    /// returning the path the browser saved it to (server-suggested name)
    async fn click_for_download(
        &mut self,
        handle: ElementHandle,
        download_dir: &Path,
    ) -> SessionResult<PathBuf>;

    /// Shuts the session down
    async fn close(self: Box<Self>) -> SessionResult<()>;
}
