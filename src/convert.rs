//! The conversion pipeline: Markdown file in, self-contained HTML file out.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use offmark_cache::{AssetCache, HttpFetcher};
use offmark_config::{AssetUrls, Config};
use offmark_render::{PageRenderer, markdown_to_fragment};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Extension of generated documents.
pub const OUTPUT_EXTENSION: &str = "html";

/// Where the page for `source` is written: beside it, same stem, `.html`.
pub fn output_path(source: impl AsRef<Path>) -> PathBuf {
    source.as_ref().with_extension(OUTPUT_EXTENSION)
}

/// Converts Markdown files into self-contained HTML pages.
///
/// Holds no state between conversions apart from the asset cache on disk, so
/// one converter can be reused for any number of files.
pub struct Converter {
    cache: AssetCache,
    renderer: PageRenderer,
    assets: AssetUrls,
}

impl Converter {
    pub fn new(cache: AssetCache, renderer: PageRenderer, assets: AssetUrls) -> Self {
        Self { cache, renderer, assets }
    }

    /// Builds a converter that downloads assets over HTTP(S) into the
    /// configured (or default) cache directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout()).or_raise(|| ErrorKind::Assets)?;
        let dir = config.cache_dir.clone().unwrap_or_else(offmark_cache::default_dir);
        let cache = AssetCache::new(dir, fetcher).or_raise(|| ErrorKind::Assets)?;
        let renderer = PageRenderer::new().or_raise(|| ErrorKind::Render)?.with_lang(&config.lang);
        Ok(Self::new(cache, renderer, config.assets.clone()))
    }

    /// Converts `source` and returns the path of the generated HTML file.
    ///
    /// Steps, in order: read the Markdown, render it to a fragment, obtain the
    /// stylesheets and script (from cache or network), assemble the page with
    /// the file stem as title, write it beside the source, then embed local
    /// images resolved against the source's directory.
    ///
    /// A missing source fails with [`ErrorKind::NotFound`] before anything is
    /// written. Missing images are logged and do not fail the conversion.
    #[instrument(skip_all, fields(source = %source.as_ref().display()))]
    pub fn convert(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        let source = source.as_ref();
        if !source.is_file() {
            exn::bail!(ErrorKind::NotFound(source.to_path_buf()));
        }
        let output = output_path(source);
        if output == source {
            exn::bail!(ErrorKind::OutputIsSource(source.to_path_buf()));
        }

        let markdown = fs::read_to_string(source).or_raise(|| ErrorKind::Read(source.to_path_buf()))?;
        let body = markdown_to_fragment(&markdown).or_raise(|| ErrorKind::Render)?;
        let (css, script) = self.load_assets()?;
        let title = source.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let page = self.renderer.render(&title, &body, &css, &script).or_raise(|| ErrorKind::Render)?;

        fs::write(&output, page).or_raise(|| ErrorKind::Write(output.clone()))?;
        let base = source.parent().unwrap_or_else(|| Path::new(""));
        let report = offmark_inline::inline_images(&output, base).or_raise(|| ErrorKind::Images)?;
        tracing::info!(
            output = %output.display(),
            images = report.embedded,
            missing_images = report.missing.len(),
            "Converted"
        );
        Ok(output)
    }

    /// Returns the concatenated stylesheets and the highlighting script.
    fn load_assets(&self) -> Result<(String, String)> {
        let stylesheet = self.cache.fetch_text(&self.assets.stylesheet).or_raise(|| ErrorKind::Assets)?;
        let highlight = self.cache.fetch_text(&self.assets.highlight_stylesheet).or_raise(|| ErrorKind::Assets)?;
        let script = self.cache.fetch_text(&self.assets.highlight_script).or_raise(|| ErrorKind::Assets)?;
        Ok((stylesheet + &highlight, script))
    }
}
