//! Cache key derivation.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use url::Url;

/// Derives the cache key for an asset URL: its last non-empty path segment.
///
/// Query strings and fragments are not part of the key, so two URLs that only
/// differ there (or two different hosts serving the same filename) share a
/// cache entry. Entries are never revalidated.
///
/// ```
/// use offmark_cache::cache_key;
/// assert_eq!(
///     cache_key("https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/highlight.min.js").unwrap(),
///     "highlight.min.js",
/// );
/// assert!(cache_key("https://example.com/").is_err());
/// ```
pub fn cache_key(url: &str) -> Result<String> {
    let parsed = Url::parse(url).or_raise(|| ErrorKind::InvalidUrl(url.to_string()))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .filter(|segment| *segment != "." && *segment != "..")
        .map(str::to_string)
        .ok_or_raise(|| ErrorKind::InvalidUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://cdn.jsdelivr.net/npm/github-markdown-css@5.2.0/github-markdown-dark.min.css", "github-markdown-dark.min.css")]
    #[case("https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/styles/github-dark.min.css", "github-dark.min.css")]
    #[case("https://example.com/a/b/style.css?v=2#top", "style.css")]
    #[case("https://example.com/a/b/", "b")]
    #[case("http://example.com/plain", "plain")]
    fn derives_final_segment(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(cache_key(url).unwrap(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("https://example.com")]
    #[case("https://example.com/")]
    #[case("mailto:someone@example.com")]
    fn rejects_urls_without_segment(#[case] url: &str) {
        let err = cache_key(url).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidUrl(url.to_string()));
    }
}
