//! Inline attribute lists: `{#id .class key=value}`.
//!
//! A list at the end of a heading applies to the heading. A list directly
//! after an image or a link applies to that image or link:
//!
//! ```markdown
//! ## Installation {#install .wide}
//!
//! ![Diagram](diagram.png){.figure width=480} see the [docs](https://example.com){target=_blank}
//! ```
//!
//! comrak has no attribute syntax, so the lists are handled in two passes.
//! [`extract`] strips them from the parsed document and leaves a numbered
//! comment marker right before each target. [`apply`] streams the rendered
//! HTML, drops the markers and sets the attributes on the next matching
//! element.

use comrak::Arena;
use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use lol_html::html_content::Element;
use lol_html::{HtmlRewriter, Settings, doc_comments, element};
use regex::Regex;
use std::cell::RefCell;
use std::sync::LazyLock;

const MARKER_PREFIX: &str = "offmark-attrs:";

static TRAILING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*(\{[^{}\n]*\})\s*$").unwrap());
static LEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{[^{}\n]*\}").unwrap());
// Smart punctuation has already curled straight quotes by the time text
// nodes are inspected, so both forms are accepted around values.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:#(?<id>[^\s#.{}="'“”‘’]+)|\.(?<class>[^\s#.{}="'“”‘’]+)|(?<key>[A-Za-z_:][\w:.-]*)=(?:"(?<dq>[^"]*)"|“(?<cq>[^”"]*)”|'(?<sq>[^'"]*)'|‘(?<sc>[^’"]*)’|(?<bare>[^\s"'“”‘’{}]+)))"#,
    )
    .unwrap()
});

/// A parsed attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

impl Attributes {
    /// Parses `{...}`. Returns `None` for an empty list or any token that is
    /// not `#id`, `.class` or `key=value`, in which case the text is left as
    /// written.
    ///
    /// ```
    /// use offmark_render::Attributes;
    /// let attrs = Attributes::parse("{#intro .wide .dark data-x=1}").unwrap();
    /// assert_eq!(attrs.id.as_deref(), Some("intro"));
    /// assert_eq!(attrs.classes, ["wide", "dark"]);
    /// assert_eq!(attrs.pairs, [("data-x".to_string(), "1".to_string())]);
    /// assert!(Attributes::parse("{not an attribute}").is_none());
    /// ```
    pub fn parse(list: &str) -> Option<Self> {
        let mut rest = list.strip_prefix('{')?.strip_suffix('}')?.trim();
        if rest.is_empty() {
            return None;
        }
        let mut attributes = Self::default();
        while !rest.is_empty() {
            let caps = TOKEN_REGEX.captures(rest)?;
            if let Some(id) = caps.name("id") {
                attributes.id = Some(id.as_str().to_string());
            } else if let Some(class) = caps.name("class") {
                attributes.classes.push(class.as_str().to_string());
            } else {
                let key = caps.name("key")?.as_str().to_string();
                let value = ["dq", "cq", "sq", "sc", "bare"].iter().find_map(|name| caps.name(name))?;
                attributes.pairs.push((key, value.as_str().to_string()));
            }
            let consumed = caps.get(0)?.end();
            let tail = &rest[consumed..];
            // Tokens must be separated by whitespace.
            if !tail.is_empty() && !tail.starts_with(char::is_whitespace) {
                return None;
            }
            rest = tail.trim_start();
        }
        Some(attributes)
    }

    fn apply_to(&self, el: &mut Element<'_, '_>) -> Result<(), lol_html::errors::AttributeNameError> {
        if let Some(id) = &self.id {
            el.set_attribute("id", id)?;
        }
        if !self.classes.is_empty() {
            let added = self.classes.join(" ");
            let class = match el.get_attribute("class") {
                Some(existing) if !existing.trim().is_empty() => format!("{} {added}", existing.trim()),
                _ => added,
            };
            el.set_attribute("class", &class)?;
        }
        for (key, value) in &self.pairs {
            el.set_attribute(key, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Heading,
    Image,
    Link,
}

impl Target {
    fn matches(self, tag: &str) -> bool {
        match self {
            Self::Heading => matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6"),
            Self::Image => tag == "img",
            Self::Link => tag == "a",
        }
    }
}

/// Attribute lists taken out of a document, in marker order.
#[derive(Debug, Default)]
pub(crate) struct Extracted(Vec<(Target, Attributes)>);

impl Extracted {
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

/// Removes attribute lists from the document and inserts a marker before
/// each element they belong to.
pub(crate) fn extract<'a>(arena: &'a Arena<AstNode<'a>>, root: &'a AstNode<'a>) -> Extracted {
    let mut extracted = Extracted::default();
    let nodes: Vec<_> = root.descendants().collect();
    for node in nodes {
        let target = match node.data.borrow().value {
            NodeValue::Heading(_) => Target::Heading,
            NodeValue::Image(_) => Target::Image,
            NodeValue::Link(_) => Target::Link,
            _ => continue,
        };
        let attributes = match target {
            Target::Heading => node.last_child().and_then(take_trailing),
            Target::Image | Target::Link => node.next_sibling().and_then(take_leading),
        };
        let Some(attributes) = attributes else { continue };

        let marker = format!("<!--{MARKER_PREFIX}{}-->", extracted.0.len());
        let value = match target {
            Target::Heading => NodeValue::HtmlBlock(NodeHtmlBlock { block_type: 2, literal: marker + "\n" }),
            Target::Image | Target::Link => NodeValue::HtmlInline(marker),
        };
        node.insert_before(arena.alloc(AstNode::from(value)));
        extracted.0.push((target, attributes));
    }
    extracted
}

fn take_trailing(node: &AstNode<'_>) -> Option<Attributes> {
    let mut ast = node.data.borrow_mut();
    let NodeValue::Text(text) = &mut ast.value else { return None };
    let caps = TRAILING_REGEX.captures(text)?;
    let attributes = Attributes::parse(caps.get(1)?.as_str())?;
    let start = caps.get(0)?.start();
    text.truncate(start);
    Some(attributes)
}

fn take_leading(node: &AstNode<'_>) -> Option<Attributes> {
    let mut ast = node.data.borrow_mut();
    let NodeValue::Text(text) = &mut ast.value else { return None };
    let end = LEADING_REGEX.find(text)?.end();
    let attributes = Attributes::parse(&text[..end])?;
    text.replace_range(..end, "");
    Some(attributes)
}

/// Removes markers from rendered HTML and sets each attribute list on the
/// first matching element after its marker.
pub(crate) fn apply(html: &str, extracted: &Extracted) -> Result<String, lol_html::errors::RewritingError> {
    let pending: RefCell<Vec<usize>> = RefCell::new(Vec::new());
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            document_content_handlers: vec![doc_comments!(|comment| {
                let index = comment
                    .text()
                    .strip_prefix(MARKER_PREFIX)
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|i| *i < extracted.0.len());
                if let Some(index) = index {
                    pending.borrow_mut().push(index);
                    comment.remove();
                }
                Ok(())
            })],
            element_content_handlers: vec![element!("h1, h2, h3, h4, h5, h6, img, a", |el| {
                let tag = el.tag_name();
                let mut pending = pending.borrow_mut();
                if let Some(position) = pending.iter().position(|i| extracted.0[*i].0.matches(&tag)) {
                    let index = pending.remove(position);
                    extracted.0[index].1.apply_to(el)?;
                }
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );
    rewriter.write(html.as_bytes())?;
    rewriter.end()?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
