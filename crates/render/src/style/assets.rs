//! Embedded assets for rendering.
//!
//! This module provides access to the page template and layout stylesheet
//! that are embedded into the binary at compile time using
//! [`rust-embed`](rust_embed).

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use std::borrow::Cow;

#[derive(Embed)]
#[folder = "../../assets/"]
pub struct Builtins;
impl Builtins {
    /// Get the raw content of a builtin asset by path, e.g. `styles/layout.css`.
    pub fn load(name: impl AsRef<str>) -> Result<Cow<'static, [u8]>> {
        Self::get(name.as_ref()).map(|f| f.data).ok_or_raise(|| ErrorKind::AssetNotFound(Self::identifier(name)))
    }

    /// Get a builtin asset as text.
    pub fn load_str(name: impl AsRef<str>) -> Result<String> {
        let name = name.as_ref();
        let data = Self::load(name)?;
        String::from_utf8(data.into_owned()).or_raise(|| ErrorKind::InvalidAsset(Self::identifier(name)))
    }

    pub fn exists(name: impl AsRef<str>) -> bool {
        Self::get(name.as_ref()).is_some()
    }

    pub(crate) fn identifier(name: impl AsRef<str>) -> String {
        format!("builtin:{}", name.as_ref().trim().trim_start_matches("builtin:"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_load_layout_style() {
        let css = Builtins::load("styles/layout.css");
        assert!(css.is_ok());
        assert!(!css.unwrap().is_empty());
    }

    #[test]
    fn can_load_page_template() {
        let template = Builtins::load_str("templates/page.html").unwrap();
        assert!(template.contains("{{ body }}"));
    }

    #[test]
    fn layout_exists() {
        assert!(Builtins::exists("styles/layout.css"));
        assert!(!Builtins::exists("styles/light.css"));
    }

    #[test]
    fn missing_asset_is_reported_with_identifier() {
        let err = Builtins::load("styles/light.css").unwrap_err();
        assert_eq!(*err, ErrorKind::AssetNotFound("builtin:styles/light.css".to_string()));
    }
}
