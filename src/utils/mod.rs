//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract a post id from an href.
///
/// Board links carry the id as the value of the last key-value pair in the
/// query string, so the id is whatever follows the final `=`. Hrefs without
/// an `=` yield an empty id.
pub fn extract_post_id(href: &str) -> String {
    match href.rsplit_once('=') {
        Some((_, id)) => id.to_string(),
        None => String::new(),
    }
}
