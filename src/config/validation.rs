use crate::config::types::{Config, CrawlerConfig, FetcherConfig, OutputConfig, SessionConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_session_config(&config.session)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let start = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start-url: {}", e)))?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url must be http or https, got '{}'",
            config.start_url
        )));
    }

    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if !config.start_url.starts_with(&config.base_url) {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' must live under base-url '{}'",
            config.start_url, config.base_url
        )));
    }

    for keyword in &config.blocklist {
        if keyword.is_empty() {
            return Err(ConfigError::Validation(
                "blocklist keywords cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "navigation-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.download_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "download-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.backoff_base < 0.0 {
        return Err(ConfigError::Validation(format!(
            "backoff-base must be non-negative, got {}",
            config.backoff_base
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    let paths = [
        ("pages-dir", &config.pages_dir),
        ("pdf-dir", &config.pdf_dir),
        ("download-dir", &config.download_dir),
        ("image-dir", &config.image_dir),
        ("progress-file", &config.progress_file),
        ("summary-path", &config.summary_path),
    ];

    for (name, value) in paths {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;

    fn base_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                start_url: "https://portal.example.com/home".to_string(),
                base_url: "https://portal.example.com".to_string(),
                page_budget: 0,
                blocklist: vec!["signout".to_string()],
            },
            session: SessionConfig {
                cookies_file: None,
                navigation_timeout_secs: 30,
                download_timeout_secs: 60,
            },
            fetcher: FetcherConfig::default(),
            output: OutputConfig {
                pages_dir: "./pages".to_string(),
                pdf_dir: "./pdf".to_string(),
                download_dir: "./downloads".to_string(),
                image_dir: "./images".to_string(),
                progress_file: "./progress.json".to_string(),
                summary_path: "./summary.md".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_start_url_outside_base_rejected() {
        let mut config = base_config();
        config.crawler.start_url = "https://other.example.com/home".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_non_http_start_url_rejected() {
        let mut config = base_config();
        config.crawler.start_url = "ftp://portal.example.com/home".to_string();
        config.crawler.base_url = "ftp://portal.example.com".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_attempts_rejected() {
        let mut config = base_config();
        config.fetcher.max_attempts = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_output_path_rejected() {
        let mut config = base_config();
        config.output.progress_file = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_blocklist_keyword_rejected() {
        let mut config = base_config();
        config.crawler.blocklist.push(String::new());
        assert!(validate(&config).is_err());
    }
}
