//! Markdown to HTML fragment conversion.

use crate::attrs;
use crate::error::{ErrorKind, Result};
use comrak::{Arena, Options, format_html, parse_document};
use exn::ResultExt;
use tracing::instrument;

/// Renders Markdown source to an HTML fragment (no `<html>`/`<body>` wrapper).
///
/// Enabled on top of CommonMark:
/// - raw HTML passthrough,
/// - footnotes, description lists, task lists, tables and strikethrough,
/// - autolinking of bare URLs,
/// - typographic substitutions (smart quotes, dashes, ellipses),
/// - heading anchors: every heading receives a GitHub-style slug id, with
///   `-1`, `-2`, ... appended to repeated slugs,
/// - attribute lists (`{#id .class key=value}`) on headings, images and
///   links; see [`Attributes`](crate::Attributes).
///
/// ```
/// let html = offmark_render::markdown_to_fragment("# Hello *World*").unwrap();
/// assert!(html.contains("id=\"hello-world\""));
/// assert!(html.contains("<em>World</em>"));
/// ```
#[instrument(skip(source), fields(source_size = source.len(), attribute_lists))]
pub fn to_fragment(source: &str) -> Result<String> {
    let options = options();
    let arena = Arena::new();
    let root = parse_document(&arena, source, &options);
    let extracted = attrs::extract(&arena, root);
    let mut html = Vec::with_capacity(source.len() * 2);
    format_html(root, &options, &mut html).or_raise(|| ErrorKind::Markdown)?;
    let html = String::from_utf8(html).or_raise(|| ErrorKind::Markdown)?;
    if extracted.is_empty() {
        return Ok(html);
    }
    tracing::Span::current().record("attribute_lists", extracted.len());
    attrs::apply(&html, &extracted).or_raise(|| ErrorKind::Markdown)
}

fn options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.footnotes = true;
    options.extension.description_lists = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.header_ids = Some(String::new());
    options.parse.smart = true;
    // Sources are local files written by the person converting them.
    options.render.unsafe_ = true;
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello[^1]\n\n[^1]: A note.", "footnote")]
    #[case("- [x] done\n- [ ] todo", "type=\"checkbox\"")]
    #[case("Term\n\n: Definition", "<dl>")]
    #[case("see https://example.com now", "<a href=\"https://example.com\">")]
    #[case("\"quoted\" -- dash", "\u{201c}quoted\u{201d} \u{2013} dash")]
    #[case("<div class=\"raw\">kept</div>", "<div class=\"raw\">kept</div>")]
    fn renders_extensions(#[case] source: &str, #[case] expected: &str) {
        let html = to_fragment(source).unwrap();
        assert!(html.contains(expected), "{expected:?} not found in {html:?}");
    }

    #[test]
    fn repeated_headings_get_unique_anchors() {
        let html = to_fragment("# Intro\n\n# Intro\n").unwrap();
        assert!(html.contains("id=\"intro\""));
        assert!(html.contains("id=\"intro-1\""));
    }

    #[test]
    fn rendering_is_deterministic() {
        let source = "# Title\n\nSome *text* with `code`.\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(to_fragment(source).unwrap(), to_fragment(source).unwrap());
    }

    #[test]
    fn heading_attributes_replace_the_slug_and_leave_the_text() {
        let html = to_fragment("## Install guide {#install .wide}\n").unwrap();
        assert!(html.contains(r#"<h2 id="install" class="wide">"#), "{html}");
        assert!(html.contains("Install guide</h2>"));
        assert!(!html.contains('{'));
        assert!(!html.contains("offmark-attrs"));
    }

    #[test]
    fn image_and_link_attributes() {
        let html = to_fragment("![Diagram](d.png){.figure width=480} and [docs](https://example.com){target=_blank}.\n").unwrap();
        assert!(html.contains(r#"<img src="d.png" alt="Diagram" class="figure" width="480" />"#), "{html}");
        assert!(html.contains(r#"<a href="https://example.com" target="_blank">docs</a>."#), "{html}");
        assert!(html.contains(" and "));
    }

    #[test]
    fn quoted_values_survive_smart_punctuation() {
        let html = to_fragment("[x](y.html){title=\"two words\"}\n").unwrap();
        assert!(html.contains(r#"title="two words""#), "{html}");
    }

    #[rstest]
    #[case("Use {braces} in prose.\n", "Use {braces} in prose.")]
    #[case("# Title {not attrs}\n", "Title {not attrs}")]
    #[case("`code{#x}`\n", "<code>code{#x}</code>")]
    fn non_attribute_braces_are_kept(#[case] source: &str, #[case] expected: &str) {
        let html = to_fragment(source).unwrap();
        assert!(html.contains(expected), "{expected:?} not found in {html:?}");
    }

    #[test]
    fn documents_without_attribute_lists_are_unchanged() {
        let source = "# A\n\n![i](i.png) [l](l.html) {plain}\n";
        assert_eq!(to_fragment(source).unwrap(), comrak::markdown_to_html(source, &options()));
    }
}
