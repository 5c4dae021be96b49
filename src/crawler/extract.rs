//! Link and asset extraction from captured markup
//!
//! Parses the rendered HTML once and pulls out everything the crawl cares
//! about: anchor targets for the frontier, image sources for the image
//! fetcher, and direct document links for the download fetcher. Relative
//! references are resolved against the page URL; nothing is deduplicated
//! here, the scheduler and the progress store decide what matters.

use scraper::{Html, Selector};
use url::Url;

/// File extensions treated as downloadable documents
const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".ppt", ".pptx", ".potx", ".docx"];

/// Everything extracted from one page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAssets {
    /// All anchor targets, absolute
    pub links: Vec<String>,
    /// All image sources, absolute
    pub images: Vec<String>,
    /// The subset of `links` whose path ends in a document extension
    pub documents: Vec<String>,
}

/// True when a name (filename, button label) ends in a document extension
pub fn is_document_name(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    DOCUMENT_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

/// True when the URL path names a document file.
///
/// The check runs on the path only, lowercased, so query strings and
/// fragments do not defeat it.
pub fn is_document_link(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };
    is_document_name(&path)
}

/// Extracts links, images, and document references from rendered markup.
///
/// References that do not resolve to an absolute URL (malformed, or schemes
/// like `javascript:` and `mailto:` kept as-is by the join) are dropped
/// silently; a portal page always carries some decorative junk.
pub fn extract_assets(html: &str, page_url: &Url) -> PageAssets {
    let document = Html::parse_document(html);
    let mut assets = PageAssets::default();

    if let Ok(anchor) = Selector::parse("a[href]") {
        for element in document.select(&anchor) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve(page_url, href) {
                    if is_document_link(&absolute) {
                        assets.documents.push(absolute.clone());
                    }
                    assets.links.push(absolute);
                }
            }
        }
    }

    if let Ok(image) = Selector::parse("img[src]") {
        for element in document.select(&image) {
            if let Some(src) = element.value().attr("src") {
                if let Some(absolute) = resolve(page_url, src) {
                    assets.images.push(absolute);
                }
            }
        }
    }

    assets
}

fn resolve(base: &Url, reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let joined = base.join(trimmed).ok()?;
    match joined.scheme() {
        "http" | "https" => Some(joined.to_string()),
        _ => None,
    }
}
