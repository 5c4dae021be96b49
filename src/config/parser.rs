use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use portico::config::load_config;
///
/// let config = load_config(Path::new("portico.toml")).unwrap();
/// println!("Start URL: {}", config.crawler.start_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[crawler]
start-url = "https://portal.example.com/home"
base-url = "https://portal.example.com"
page-budget = 50

[session]
cookies-file = "./cookies.json"

[fetcher]
max-attempts = 3
backoff-base = 2.0

[output]
pages-dir = "./data/scraped_pages"
pdf-dir = "./data/pages_as_pdf"
download-dir = "./data/downloads"
image-dir = "./data/saved_images"
progress-file = "./data/progress_summary.json"
summary-path = "./data/summary.md"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.start_url, "https://portal.example.com/home");
        assert_eq!(config.crawler.page_budget, 50);
        assert_eq!(config.fetcher.max_attempts, 3);
        // Default blocklist applies when the key is omitted
        assert_eq!(config.crawler.blocklist, vec!["signout", "logout", "print"]);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/portico.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        // start-url outside base-url
        let bad = VALID_CONFIG.replace(
            "start-url = \"https://portal.example.com/home\"",
            "start-url = \"https://elsewhere.example.com/home\"",
        );
        let file = create_temp_config(&bad);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_fetcher_section_optional() {
        let without_fetcher = VALID_CONFIG.replace(
            "[fetcher]\nmax-attempts = 3\nbackoff-base = 2.0\n",
            "",
        );
        let file = create_temp_config(&without_fetcher);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fetcher.max_attempts, 3);
        assert_eq!(config.fetcher.backoff_base, 2.0);
    }
}
