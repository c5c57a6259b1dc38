//! Classification and resolution of `img` `src` values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Prefix of a value that is already an embedded data URI.
pub const DATA_URI_PREFIX: &str = "data:";

static REMOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").unwrap());

/// What an `img` `src` value points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Absolute `http://` or `https://` URL; left untouched.
    Remote,
    /// Already a `data:` URI; left untouched.
    Embedded,
    /// A filesystem path, resolved to an absolute path against the base
    /// directory. It may or may not exist.
    Local(PathBuf),
}

impl ImageRef {
    /// Classifies `src`, resolving local references against `base`.
    ///
    /// Returns `None` for an empty value, which is skipped entirely.
    ///
    /// ```
    /// use offmark_inline::ImageRef;
    /// use std::path::Path;
    ///
    /// let base = Path::new("/docs");
    /// assert_eq!(ImageRef::classify("", base), None);
    /// assert_eq!(ImageRef::classify("https://example.com/a.png", base), Some(ImageRef::Remote));
    /// assert_eq!(ImageRef::classify("data:image/png;base64,AAAA", base), Some(ImageRef::Embedded));
    /// assert!(matches!(ImageRef::classify("img/a.png", base), Some(ImageRef::Local(_))));
    /// ```
    pub fn classify(src: &str, base: &Path) -> Option<Self> {
        if src.is_empty() {
            return None;
        }
        if src.starts_with(DATA_URI_PREFIX) {
            return Some(Self::Embedded);
        }
        if REMOTE_REGEX.is_match(src) {
            return Some(Self::Remote);
        }
        Some(Self::Local(resolve(src, base)))
    }
}

/// Resolves a relative reference against `base` into an absolute path.
///
/// Markdown renderers percent-encode spaces and non-ASCII characters in
/// URLs, so the decoded form is tried first. The raw form is used only when
/// it exists on disk and the decoded form does not (a file literally named
/// `a%20b.png`).
pub fn resolve(src: &str, base: &Path) -> PathBuf {
    let raw = absolute(base.join(src));
    match urlencoding::decode(src) {
        Ok(decoded) if decoded != src => {
            let decoded = absolute(base.join(decoded.as_ref()));
            if !decoded.exists() && raw.exists() { raw } else { decoded }
        },
        _ => raw,
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// MIME type for an image path: `image/` followed by the lowercased extension.
///
/// No canonicalization takes place, so `.jpg` yields `image/jpg` rather than
/// `image/jpeg`, and a path without an extension yields `image/`.
pub fn mime_type(path: &Path) -> String {
    let extension = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    format!("image/{extension}")
}

/// Encodes image bytes as `data:<mime>;base64,<payload>`.
pub fn data_uri(path: &Path, bytes: &[u8]) -> String {
    format!("{DATA_URI_PREFIX}{};base64,{}", mime_type(path), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[rstest]
    #[case("http://example.com/a.png", ImageRef::Remote)]
    #[case("https://example.com/a.png?size=2", ImageRef::Remote)]
    #[case("data:image/png;base64,iVBORw0KGgo=", ImageRef::Embedded)]
    #[case("data:,", ImageRef::Embedded)]
    fn untouched_references(#[case] src: &str, #[case] expected: ImageRef) {
        assert_eq!(ImageRef::classify(src, Path::new("/base")), Some(expected));
    }

    #[rstest]
    #[case("ftp://example.com/a.png")]
    #[case("//example.com/a.png")]
    #[case("HTTPS://example.com/a.png")]
    #[case("pic.png")]
    #[case("./img/pic.png")]
    fn other_references_are_local(#[case] src: &str) {
        assert!(matches!(ImageRef::classify(src, Path::new("/base")), Some(ImageRef::Local(_))));
    }

    #[test]
    fn empty_source_is_skipped() {
        assert_eq!(ImageRef::classify("", Path::new("/base")), None);
    }

    #[test]
    fn local_paths_are_absolute() {
        let Some(ImageRef::Local(path)) = ImageRef::classify("img/pic.png", Path::new("relative/dir")) else {
            panic!("expected a local reference");
        };
        assert!(path.is_absolute());
        assert!(path.ends_with("relative/dir/img/pic.png"));
    }

    #[test]
    fn resolves_percent_encoded_spaces_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("my images")).unwrap();
        fs::write(dir.path().join("my images").join("圖片 1.png"), b"png").unwrap();

        let encoded = resolve("my%20images/%E5%9C%96%E7%89%87%201.png", dir.path());
        assert!(encoded.is_file());
        let plain = resolve("my images/圖片 1.png", dir.path());
        assert_eq!(encoded, plain);
    }

    #[test]
    fn literal_percent_filename_still_resolves() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("100%25.png"), b"png").unwrap();
        assert!(resolve("100%25.png", dir.path()).is_file());
    }

    #[rstest]
    #[case("a.png", "image/png")]
    #[case("a.JPG", "image/jpg")]
    #[case("a.jpeg", "image/jpeg")]
    #[case("dir.v2/a.SVG", "image/svg")]
    #[case("noext", "image/")]
    fn mime_uses_raw_extension(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(mime_type(Path::new(path)), expected);
    }

    #[test]
    fn data_uri_round_trips_bytes() {
        let bytes = [0x89, b'P', b'N', b'G', 0x00, 0xff];
        let uri = data_uri(Path::new("x.png"), &bytes);
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
    }
}
