//! Layered configuration for offmark.
//!
//! Settings are merged from, in increasing priority:
//! 1. built-in defaults ([`Config::default`]),
//! 2. a TOML file: the `--config` path if given, otherwise
//!    `<config dir>/offmark/config.toml` when it exists,
//! 3. `OFFMARK_*` environment variables, with `__` separating nested keys
//!    (e.g. `OFFMARK_ASSETS__HIGHLIGHT_SCRIPT`).
//!
//! Command-line overrides are applied by the caller on the extracted value.
//!
//! ```toml
//! cache_dir = "/var/cache/offmark"
//! timeout = 20
//! lang = "zh-TW"
//!
//! [assets]
//! stylesheet = "https://cdn.jsdelivr.net/npm/github-markdown-css@5.2.0/github-markdown-dark.min.css"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "OFFMARK_";
/// Name of the configuration file inside the user configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Dark GitHub Markdown stylesheet.
pub const DEFAULT_STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/npm/github-markdown-css@5.2.0/github-markdown-dark.min.css";
/// Dark highlight.js theme.
pub const DEFAULT_HIGHLIGHT_STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/styles/github-dark.min.css";
/// highlight.js browser bundle.
pub const DEFAULT_HIGHLIGHT_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/highlight.min.js";

/// Remote assets inlined into every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetUrls {
    /// Page stylesheet; concatenated before `highlight_stylesheet`.
    pub stylesheet: String,
    /// Syntax-highlighting theme.
    pub highlight_stylesheet: String,
    /// Syntax-highlighting script exposing a global `hljs`.
    pub highlight_script: String,
}
impl Default for AssetUrls {
    fn default() -> Self {
        Self {
            stylesheet: DEFAULT_STYLESHEET_URL.to_string(),
            highlight_stylesheet: DEFAULT_HIGHLIGHT_STYLESHEET_URL.to_string(),
            highlight_script: DEFAULT_HIGHLIGHT_SCRIPT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Asset cache directory. `None` means the shared default inside the
    /// system temporary directory.
    pub cache_dir: Option<PathBuf>,
    /// Per-request download timeout, in seconds.
    pub timeout: u64,
    /// Value of the generated document's `lang` attribute.
    pub lang: String,
    pub assets: AssetUrls,
}
impl Default for Config {
    fn default() -> Self {
        Self { cache_dir: None, timeout: 10, lang: "en".to_string(), assets: AssetUrls::default() }
    }
}

impl Config {
    /// Location of the per-user configuration file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "offmark").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Builds the layered [`Figment`] without extracting it.
    ///
    /// A missing default file is silently skipped; an explicit `file` must exist.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let file = match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), exists = path.is_file(), "Configuration file");
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Loads and validates configuration from all layers.
    #[instrument(level = "debug")]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(file)?)
    }

    /// Extracts and validates configuration from an already-built figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            exn::bail!(ErrorKind::Validation { field: "timeout", reason: "must be greater than zero".to_string() });
        }
        if self.lang.trim().is_empty() {
            exn::bail!(ErrorKind::Validation { field: "lang", reason: "must not be empty".to_string() });
        }
        let urls = [
            ("assets.stylesheet", &self.assets.stylesheet),
            ("assets.highlight_stylesheet", &self.assets.highlight_stylesheet),
            ("assets.highlight_script", &self.assets.highlight_script),
        ];
        for (field, url) in urls {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                exn::bail!(ErrorKind::Validation { field, reason: format!("not an http(s) URL: {url}") });
            }
        }
        Ok(())
    }

    /// Download timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
