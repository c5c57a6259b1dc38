//! Table of contents derived from the headings of a rendered fragment.

use scraper::{Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::instrument;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(HEADING_SELECTOR, "h1, h2, h3");
selector!(ANCHOR_SELECTOR, "a[id]");

/// Horizontal indentation added per heading level below `h1`.
pub const INDENT_STEP_PX: u32 = 12;

/// One navigation link in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level, `1..=3`.
    pub level: u8,
    /// The heading's rendered text content.
    pub text: String,
    /// In-page anchor id (without the leading `#`). Empty if the heading has
    /// no id, in which case the link targets the top of the page.
    pub anchor: String,
    /// Left margin in pixels: `0` for `h1`, one [`INDENT_STEP_PX`] per level below.
    pub indent: u32,
}

impl TocEntry {
    fn new(level: u8, text: String, anchor: String) -> Self {
        let indent = u32::from(level.saturating_sub(1)) * INDENT_STEP_PX;
        Self { level, text, anchor, indent }
    }
}

/// Walks every `h1`, `h2` and `h3` in document order.
///
/// The anchor is the heading's own `id`, falling back to the first descendant
/// link carrying an `id` (the Markdown renderer places heading anchors there).
///
/// ```
/// use offmark_render::outline;
/// let toc = outline(r#"<h1 id="intro">Intro</h1><p>..</p><h2 id="details">Details</h2><h4>skipped</h4>"#);
/// assert_eq!(toc.len(), 2);
/// assert_eq!((toc[0].anchor.as_str(), toc[0].indent), ("intro", 0));
/// assert_eq!((toc[1].anchor.as_str(), toc[1].indent), ("details", 12));
/// ```
#[instrument(level = "debug", skip(fragment), fields(fragment_size = fragment.len(), headings))]
pub fn outline(fragment: &str) -> Vec<TocEntry> {
    let document = Html::parse_fragment(fragment);
    let entries: Vec<TocEntry> = document
        .select(&HEADING_SELECTOR)
        .filter_map(|heading| {
            let level = heading.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            let anchor = heading
                .value()
                .id()
                .or_else(|| heading.select(&ANCHOR_SELECTOR).next().and_then(|a| a.value().id()))
                .unwrap_or_default()
                .to_string();
            Some(TocEntry::new(level, heading.text().collect(), anchor))
        })
        .collect();
    tracing::Span::current().record("headings", entries.len());
    entries
}
