//! CSS style management for rendered documents.
//!
//! Styles are assembled through [`StyleConfig`]'s builder API, combining
//! compile-time embedded builtins with raw CSS content such as downloaded themes. Builtins are validated at
//! construction time so that rendering never fails on a missing stylesheet.

pub(crate) mod assets;

use crate::error::{ErrorKind, Result};
use crate::style::assets::Builtins;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Builtin stylesheet providing the dark two-column page layout.
pub const LAYOUT_STYLESHEET: &str = "styles/layout.css";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Style {
    Builtin(String),
    Content(String),
}
impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let content = match self {
            // Builtins were checked in `with_builtin`; an empty block is the
            // only thing that could go out if the binary were somehow altered.
            Self::Builtin(name) => Builtins::load(name).map(|c| String::from_utf8_lossy(&c).into_owned()).unwrap_or_default(),
            Self::Content(content) => content.clone(),
        };
        writeln!(f, "<style>{content}</style>")
    }
}

/// An ordered collection of CSS stylesheets to embed in a page.
///
/// Styles are emitted in insertion order, each inside its own `<style>`
/// element, so later styles override earlier ones. Content is embedded
/// verbatim; malformed CSS is the caller's concern.
///
/// # Example
///
/// ```
/// use offmark_render::StyleConfig;
/// # use offmark_render::error::Result;
///
/// # fn get_styles() -> Result<StyleConfig> {
/// let styles = StyleConfig::new()
///     .with_content(".markdown-body { color: #c9d1d9; }")
///     .with_builtin("styles/layout.css")?;
/// assert_eq!(styles.to_string().matches("<style>").count(), 2);
/// # Ok(styles)
/// # }
/// # get_styles().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleConfig {
    styles: Vec<Style>,
}
impl StyleConfig {
    /// Creates an empty style configuration with no stylesheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a builtin stylesheet by name.
    ///
    /// Returns [`ErrorKind::AssetNotFound`](crate::error::ErrorKind::AssetNotFound)
    /// if `name` does not match any embedded asset.
    pub fn with_builtin(mut self, name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if !Builtins::exists(name) {
            exn::bail!(ErrorKind::AssetNotFound(Builtins::identifier(name)));
        }
        self.styles.push(Style::Builtin(name.to_string()));
        Ok(self)
    }

    /// Appends raw CSS content as a stylesheet. This is infallible since no
    /// I/O is involved.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.styles.push(Style::Content(content.into()));
        self
    }
}
impl Display for StyleConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for style in &self.styles {
            write!(f, "{style}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_styles_in_insertion_order() {
        let styles = StyleConfig::new().with_content("a{}").with_content("b{}");
        assert_eq!(styles.to_string(), "<style>a{}</style>\n<style>b{}</style>\n");
    }

    #[test]
    fn content_is_embedded_verbatim() {
        let garbage = "}} not { css </p>";
        let styles = StyleConfig::new().with_content(garbage);
        assert_eq!(styles.to_string(), format!("<style>{garbage}</style>\n"));
    }

    #[test]
    fn builtin_layout_is_embedded() {
        let styles = StyleConfig::new().with_builtin(LAYOUT_STYLESHEET).unwrap();
        let html = styles.to_string();
        assert!(html.starts_with("<style>"));
        assert!(html.contains("#toc"));
    }

    #[test]
    fn unknown_builtin_is_rejected() {
        let err = StyleConfig::new().with_builtin("styles/nope.css").unwrap_err();
        assert_eq!(*err, ErrorKind::AssetNotFound("builtin:styles/nope.css".to_string()));
    }
}
