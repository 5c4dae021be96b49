//! Configuration module for Portico
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use portico::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("portico.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.start_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, OutputConfig, SessionConfig};

// Re-export parser functions
pub use parser::load_config;
