//! Self-contained page assembly.
//!
//! The page template lives in `assets/templates/page.html` and is compiled
//! once per [`PageRenderer`]. Template values are substituted verbatim, with
//! the exception of navigation link text and anchors: those come from heading
//! *text content* and have to be escaped again before going back into markup.

use crate::error::{ErrorKind, Result};
use crate::outline::{TocEntry, outline};
use crate::style::assets::Builtins;
use crate::style::{LAYOUT_STYLESHEET, StyleConfig};
use exn::ResultExt;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::instrument;
use upon::{Engine, Template, Value, fmt as upon_fmt};

/// Builtin page template.
pub const PAGE_TEMPLATE: &str = "templates/page.html";
/// Document language used when none is configured.
pub const DEFAULT_LANG: &str = "en";

/// Values exposed to the page template.
#[derive(Serialize)]
struct PageContext<'a> {
    lang: &'a str,
    title: &'a str,
    styles: String,
    toc: Vec<TocEntry>,
    body: &'a str,
    script: &'a str,
}

/// Renders complete, self-contained HTML documents.
///
/// # Layout
///
/// - `nav#toc`: one link per `h1`/`h2`/`h3` of the body, in document order,
///   indented 12px per level below `h1`.
/// - `article#content.markdown-body`: the body fragment, verbatim.
/// - The supplied CSS in its own `<style>` element, followed by the builtin
///   dark layout stylesheet.
/// - The supplied script in its own `<script>` element, followed by an inline
///   script highlighting every `pre code` block.
///
/// # Example
///
/// ```
/// use offmark_render::PageRenderer;
///
/// let renderer = PageRenderer::new().unwrap();
/// let html = renderer.render("notes", "<h1 id=\"intro\">Intro</h1>", "body{}", "var hljs;").unwrap();
/// assert!(html.contains("<title>notes</title>"));
/// assert!(html.contains(r##"<a href="#intro" style="margin-left:0px">Intro</a>"##));
/// ```
pub struct PageRenderer {
    engine: Engine<'static>,
    template: Template<'static>,
    lang: String,
}

impl PageRenderer {
    /// Compiles the builtin page template.
    pub fn new() -> Result<Self> {
        Self::from_template(Builtins::load_str(PAGE_TEMPLATE)?)
    }

    /// Compiles a custom page template with the same variables as the builtin
    /// one: `lang`, `title`, `styles`, `toc` (list of `text`, `anchor`,
    /// `level`, `indent`), `body` and `script`.
    pub fn from_template(source: impl Into<String>) -> Result<Self> {
        let mut engine = Engine::new();
        engine.add_formatter("escape", escape_formatter);
        // Compile the template early so we can fail-fast in construction.
        let template = engine.compile(source.into()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template, lang: DEFAULT_LANG.to_string() })
    }

    /// Sets the `lang` attribute of the generated `<html>` element.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Assembles a full document from a title, a rendered body fragment, CSS
    /// text and script text.
    #[instrument(skip_all, fields(title = title, body_size = body.len(), css_size = css.len(), script_size = script.len()))]
    pub fn render(&self, title: &str, body: &str, css: &str, script: &str) -> Result<String> {
        let styles = StyleConfig::new().with_content(css).with_builtin(LAYOUT_STYLESHEET)?;
        let context = PageContext {
            lang: &self.lang,
            title,
            styles: styles.to_string(),
            toc: outline(body),
            body,
            script,
        };
        let html = self.template.render(&self.engine, &context).to_string().or_raise(|| ErrorKind::Template)?;
        tracing::debug!(links = context.toc.len(), bytes = html.len(), "Page rendered");
        Ok(html)
    }
}

/// Escapes strings for use in element text and double-quoted attributes.
fn escape_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
    match value {
        Value::String(s) => f.write_str(&html_escape::encode_double_quoted_attribute(s))?,
        v => upon_fmt::default(f, v)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::to_fragment;

    fn render(title: &str, body: &str) -> String {
        PageRenderer::new().unwrap().render(title, body, "/* theme */ .markdown-body{}", "/* hl */ var hljs;").unwrap()
    }

    #[test]
    fn embeds_inputs_verbatim() {
        let body = "<p>Body <b>text</b></p>";
        let html = render("My Notes", body);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>My Notes</title>"));
        assert!(html.contains("<style>/* theme */ .markdown-body{}</style>"));
        assert!(html.contains(&format!("<article class=\"markdown-body\" id=\"content\">\n{body}\n</article>")));
        assert!(html.contains("<script>/* hl */ var hljs;</script>"));
        assert!(html.contains("hljs.highlightElement(el)"));
    }

    #[test]
    fn supplied_css_precedes_layout() {
        let html = render("t", "");
        let theme = html.find("/* theme */").unwrap();
        let layout = html.find("#toc {").unwrap();
        assert!(theme < layout);
    }

    #[test]
    fn supplied_script_precedes_highlighting() {
        let html = render("t", "<pre><code>x</code></pre>");
        let supplied = html.find("/* hl */").unwrap();
        let highlight = html.find("hljs.highlightElement").unwrap();
        assert!(supplied < highlight);
    }

    #[test]
    fn title_is_substituted_without_escaping() {
        let html = render("R&D <draft>", "");
        assert!(html.contains("<title>R&D <draft></title>"));
    }

    #[test]
    fn navigation_links_follow_headings() {
        let html = render("t", &to_fragment("# Intro\n\ntext\n\n## Details\n\n### Fine print\n").unwrap());
        let intro = html.find(r##"<a href="#intro" style="margin-left:0px">Intro</a>"##).unwrap();
        let details = html.find(r##"<a href="#details" style="margin-left:12px">Details</a>"##).unwrap();
        let fine = html.find(r##"<a href="#fine-print" style="margin-left:24px">Fine print</a>"##).unwrap();
        assert!(intro < details && details < fine);
        let nav_end = html.find("</nav>").unwrap();
        assert!(fine < nav_end);
    }

    #[test]
    fn navigation_text_is_escaped() {
        let html = render("t", "<h2 id=\"a\">Fish &amp; Chips &lt;3</h2>");
        assert!(html.contains(r##"<a href="#a" style="margin-left:12px">Fish &amp; Chips &lt;3</a>"##));
    }

    #[test]
    fn navigation_anchor_cannot_break_out_of_attribute() {
        let html = render("t", r#"<h1 id="a&quot;b&lt;c">Quote "me"</h1>"#);
        assert!(html.contains(r##"<a href="#a&quot;b&lt;c" style="margin-left:0px">Quote &quot;me&quot;</a>"##));
    }

    #[test]
    fn escape_formatter_passes_numbers_through() {
        let renderer = PageRenderer::from_template("{% for e in toc %}{{ e.indent | escape }}|{{ e.text | escape }}{% endfor %}").unwrap();
        let html = renderer.render("t", "<h2>a &amp; b</h2>", "", "").unwrap();
        assert_eq!(html, "12|a &amp; b");
    }

    #[test]
    fn empty_body_has_empty_navigation() {
        let html = render("t", "");
        assert!(html.contains("<nav id=\"toc\">\n</nav>"));
    }

    #[test]
    fn lang_is_configurable() {
        let renderer = PageRenderer::new().unwrap().with_lang("zh-TW");
        let html = renderer.render("t", "", "", "").unwrap();
        assert!(html.contains("<html lang=\"zh-TW\">"));
        assert!(render("t", "").contains("<html lang=\"en\">"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let body = to_fragment("# A\n\n## B\n\n![pic](pic.png)\n").unwrap();
        assert_eq!(render("same", &body), render("same", &body));
    }

    #[test]
    fn invalid_custom_template_fails_fast() {
        assert!(PageRenderer::from_template("{{ unclosed").is_err());
    }

    #[test]
    fn custom_template_receives_outline() {
        let renderer = PageRenderer::from_template("{% for e in toc %}{{ e.level }}:{{ e.anchor }};{% endfor %}").unwrap();
        let html = renderer.render("t", "<h1 id=\"x\">X</h1><h3 id=\"y\">Y</h3>", "", "").unwrap();
        assert_eq!(html, "1:x;3:y;");
    }
}
