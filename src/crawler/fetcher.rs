//! Retrying HTTP fetcher for page assets
//!
//! Images and directly linked documents are fetched over plain HTTP rather
//! than through the browser. Failures here are expected and non-fatal: a
//! missing asset never stops the crawl, so the fetcher retries with
//! exponential backoff and reports an unrecoverable asset as `None` instead
//! of an error.

use crate::config::FetcherConfig;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Builds the HTTP client used for asset fetches.
///
/// The browser user agent matters: asset endpoints behind the portal's CDN
/// reject obvious bot agents even when the request itself is fine.
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads `url` into `dest_dir`, retrying transient failures.
///
/// Up to `max_attempts` tries, sleeping `backoff_base ^ attempt` seconds
/// after each failed one. Returns the saved path, or `None` once the
/// attempts are exhausted; the caller records the miss and moves on.
pub async fn download(
    client: &Client,
    config: &FetcherConfig,
    url: &str,
    dest_dir: &Path,
    filename: &str,
) -> Option<PathBuf> {
    for attempt in 1..=config.max_attempts {
        match try_download(client, url, dest_dir, filename).await {
            Ok(path) => {
                debug!(url, path = %path.display(), attempt, "asset saved");
                return Some(path);
            }
            Err(e) => {
                warn!(url, attempt, max = config.max_attempts, error = %e, "fetch failed");
                if attempt < config.max_attempts {
                    let delay = config.backoff_base.powi(attempt as i32);
                    tokio::time::sleep(Duration::from_secs_f64(delay)).await;
                }
            }
        }
    }

    warn!(url, "asset given up after {} attempts", config.max_attempts);
    None
}

/// One fetch attempt, streaming the body to disk
async fn try_download(
    client: &Client,
    url: &str,
    dest_dir: &Path,
    filename: &str,
) -> Result<PathBuf, FetchError> {
    let response = client.get(url).send().await?.error_for_status()?;

    tokio::fs::create_dir_all(dest_dir).await?;
    let dest = dest_dir.join(filename);

    let mut file = tokio::fs::File::create(&dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        tokio::io::AsyncWriteExt::write_all(&mut file, &chunk?).await?;
    }
    tokio::io::AsyncWriteExt::flush(&mut file).await?;

    Ok(dest)
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
