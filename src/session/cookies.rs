//! Cookie loading for session authentication
//!
//! Login itself happens outside this crate: an SSO automation exports the
//! authenticated cookie set to a JSON file, and the session backend replays
//! those cookies into the browser before the crawl starts.

use crate::session::{SessionError, SessionResult};
use serde::Deserialize;
use std::path::Path;

/// One browser cookie as exported by the external login flow
#[derive(Debug, Clone, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(rename = "httpOnly", default)]
    pub http_only: bool,
    /// Unix expiry timestamp; session cookie when absent
    #[serde(default)]
    pub expiry: Option<f64>,
}

fn default_path() -> String {
    "/".to_string()
}

/// Loads the exported cookie set from a JSON file.
///
/// A missing or unreadable file is an authentication failure: without the
/// cookies the portal will bounce every navigation to the login page.
pub fn load_cookies(path: &Path) -> SessionResult<Vec<Cookie>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SessionError::Cookies(format!("cannot read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| SessionError::Cookies(format!("cannot parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_cookies() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"name": "SESSION", "value": "abc123", "domain": ".example.com",
                 "path": "/", "secure": true, "httpOnly": true, "expiry": 1893456000},
                {"name": "pref", "value": "1", "domain": "portal.example.com"}
            ]"#,
        )
        .unwrap();
        file.flush().unwrap();

        let cookies = load_cookies(file.path()).unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "SESSION");
        assert!(cookies[0].http_only);
        assert_eq!(cookies[1].path, "/");
        assert!(cookies[1].expiry.is_none());
    }

    #[test]
    fn test_missing_file_is_cookie_error() {
        let result = load_cookies(Path::new("/nonexistent/cookies.json"));
        assert!(matches!(result, Err(SessionError::Cookies(_))));
    }

    #[test]
    fn test_malformed_json_is_cookie_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        file.flush().unwrap();

        let result = load_cookies(file.path());
        assert!(matches!(result, Err(SessionError::Cookies(_))));
    }
}
