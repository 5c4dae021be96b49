use serde::Deserialize;

/// Main configuration structure for Portico
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; always re-crawled, even on resume
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Prefix child links must carry to be enqueued
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum pages to complete in one run; 0 means unbounded
    #[serde(rename = "page-budget", default)]
    pub page_budget: u64,

    /// Case-insensitive substrings that cause a URL to be skipped
    #[serde(default = "default_blocklist")]
    pub blocklist: Vec<String>,
}

fn default_blocklist() -> Vec<String> {
    vec!["signout".into(), "logout".into(), "print".into()]
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding the cookies exported by the external SSO login.
    /// When absent the session starts unauthenticated.
    #[serde(rename = "cookies-file", default)]
    pub cookies_file: Option<String>,

    /// Per-page navigation timeout in seconds
    #[serde(rename = "navigation-timeout-secs", default = "default_nav_timeout")]
    pub navigation_timeout_secs: u64,

    /// How long to wait for an intercepted download to land on disk
    #[serde(rename = "download-timeout-secs", default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

fn default_nav_timeout() -> u64 {
    30
}

fn default_download_timeout() -> u64 {
    60
}

/// Asset fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Maximum HTTP attempts per asset
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base of the exponential backoff between attempts, in seconds
    #[serde(rename = "backoff-base", default = "default_backoff_base")]
    pub backoff_base: f64,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent on asset requests
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base: default_backoff_base(),
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> f64 {
    2.0
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

/// Output directory and file layout
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for HTML snapshots
    #[serde(rename = "pages-dir")]
    pub pages_dir: String,

    /// Directory for PDF renders
    #[serde(rename = "pdf-dir")]
    pub pdf_dir: String,

    /// Directory for intercepted and fetched document downloads
    #[serde(rename = "download-dir")]
    pub download_dir: String,

    /// Directory for fetched images
    #[serde(rename = "image-dir")]
    pub image_dir: String,

    /// Path of the JSON progress file
    #[serde(rename = "progress-file")]
    pub progress_file: String,

    /// Path of the markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
