//! Portico: a resumable archiving crawler for authenticated portals
//!
//! This crate crawls an authenticated design-system portal through a browser
//! session, capturing each page as HTML and PDF along with in-page downloads
//! and images, and records progress in a JSON file so interrupted runs can
//! resume where they left off.

pub mod config;
pub mod crawler;
pub mod output;
pub mod progress;
pub mod session;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Portico operations
#[derive(Debug, Error)]
pub enum PorticoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Capture failed for {url}: {message}")]
    Capture { url: String, message: String },

    #[error("Progress file {path} is corrupt: {source}")]
    CorruptProgress {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Portico operations
pub type Result<T> = std::result::Result<T, PorticoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use progress::ProgressEntry;
pub use session::PageSession;
