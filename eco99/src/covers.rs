//! Album cover helpers
//!
//! Covers are not a field of their own in the eco99fm feeds: they hide in
//! the HTML `description` of every item. The feed is also inconsistent about
//! the picture URL, sometimes prepending the pictures folder twice.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pictures folder the feed sometimes duplicates in front of cover URLs
pub const DEFAULT_DUPLICATE_PREFIX: &str = "https://eco99fm.maariv.co.il/download/Sets/pictures/";

/// Marker of category artwork, whose single prefix must also be removed
pub const CATEGORY_MARKER: &str = "SetsCategories";

static COVER_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"src='([^']+)'").expect("valid cover regex"));

/// Extracts the first `src='…'` URL of an item description
///
/// ```
/// use eco99::covers::extract_cover;
///
/// assert_eq!(
///     extract_cover("<img src='http://x/a.jpg'/>"),
///     Some("http://x/a.jpg".to_string())
/// );
/// assert_eq!(extract_cover("no picture"), None);
/// ```
pub fn extract_cover(description: &str) -> Option<String> {
    COVER_SRC
        .captures(description)
        .map(|caps| caps[1].to_string())
}

/// Rewrites a cover URL to undo the feed's duplicated prefix
///
/// - `prefix` absent: unchanged
/// - `prefix` present once and the URL is category artwork: prefix removed
/// - `prefix` present more than once: first occurrence removed
/// - `prefix` present once otherwise: unchanged
pub fn normalize_cover(url: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return url.to_string();
    }

    match url.matches(prefix).count() {
        0 => url.to_string(),
        1 if url.contains(CATEGORY_MARKER) => url.replacen(prefix, "", 1),
        1 => url.to_string(),
        _ => url.replacen(prefix, "", 1),
    }
}
