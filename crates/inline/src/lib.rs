//! Embeds local images into saved HTML documents as base64 data URIs.
//!
//! Every `img` element's `src` is classified (see [`ImageRef`]): remote URLs
//! and existing data URIs are left alone, local paths are resolved against a
//! base directory and, if the file exists, replaced by a data URI. A missing
//! file is logged and left as-is; it is never fatal.
//!
//! Rewriting is streamed through `lol_html`, so only the touched attribute
//! values change and every other byte of the document is preserved. Running
//! the inliner twice is therefore a no-op the second time.

pub mod error;
mod reference;

use crate::error::{ErrorKind, Result};
pub use crate::reference::{DATA_URI_PREFIX, ImageRef, data_uri, mime_type, resolve};
use exn::ResultExt;
use lol_html::{HtmlRewriter, Settings, element};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Outcome of one inlining pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineReport {
    /// Local images replaced by data URIs.
    pub embedded: usize,
    /// Empty, remote or already-embedded references left untouched.
    pub skipped: usize,
    /// Resolved paths of local references that do not exist, once per
    /// occurrence and in document order.
    pub missing: Vec<PathBuf>,
}

impl InlineReport {
    /// Returns `true` if the pass changed the document.
    pub fn changed(&self) -> bool {
        self.embedded > 0
    }
}

/// Inlines the local images of the HTML document at `html_path`, overwriting
/// it in place. Relative references are resolved against `base_dir`.
#[instrument(skip_all, fields(html_path = %html_path.as_ref().display(), base_dir = %base_dir.as_ref().display()))]
pub fn inline_images(html_path: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> Result<InlineReport> {
    let html_path = html_path.as_ref();
    let html = fs::read_to_string(html_path).or_raise(|| ErrorKind::Document(html_path.to_path_buf()))?;
    let (rewritten, report) = inline_html(&html, base_dir.as_ref())?;
    fs::write(html_path, rewritten).or_raise(|| ErrorKind::Document(html_path.to_path_buf()))?;
    tracing::info!(
        embedded = report.embedded,
        skipped = report.skipped,
        missing = report.missing.len(),
        "Images inlined"
    );
    Ok(report)
}

/// Inlines the local images of an HTML string, returning the rewritten
/// document alongside a report of what was done.
pub fn inline_html(html: &str, base_dir: &Path) -> Result<(String, InlineReport)> {
    let mut output = Vec::with_capacity(html.len());
    let mut report = InlineReport::default();
    let mut unreadable: Option<PathBuf> = None;

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("img[src]", |el| {
                // Attribute values come back exactly as written, entities included.
                let raw = el.get_attribute("src").unwrap_or_default();
                let src = html_escape::decode_html_entities(&raw);
                let path = match ImageRef::classify(&src, base_dir) {
                    Some(ImageRef::Local(path)) => path,
                    None | Some(ImageRef::Remote | ImageRef::Embedded) => {
                        report.skipped += 1;
                        return Ok(());
                    },
                };
                if !path.is_file() {
                    tracing::warn!(path = %path.display(), src = %raw, "Image not found; leaving reference unchanged");
                    report.missing.push(path);
                    return Ok(());
                }
                let bytes = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        unreadable = Some(path);
                        return Err(e.into());
                    },
                };
                el.set_attribute("src", &data_uri(&path, &bytes))?;
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "Image embedded");
                report.embedded += 1;
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    let outcome = rewriter.write(html.as_bytes()).and_then(|()| rewriter.end());
    match (outcome, unreadable) {
        (Ok(()), _) => {},
        (Err(e), Some(path)) => return Err(e).or_raise(|| ErrorKind::Image(path)),
        (Err(e), None) => return Err(e).or_raise(|| ErrorKind::Rewrite),
    }
    let html = String::from_utf8(output).or_raise(|| ErrorKind::Rewrite)?;
    Ok((html, report))
}
