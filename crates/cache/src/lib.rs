//! Persistent on-disk cache for remote stylesheet and script assets.
//!
//! Every asset is stored as a single file named after the final path segment
//! of its URL (see [`cache_key`]). The first request for a key downloads the
//! asset through the injected [`Fetch`] implementation and persists it; every
//! later request, from this process or any later one sharing the directory,
//! is served from disk without touching the network.
//!
//! There is deliberately no manifest, no expiry and no revalidation: a cached
//! file is assumed to be the correct content for its key forever. Two URLs
//! sharing a final segment, or a hand-edited cache file, will be served
//! silently.
//!
//! The cache takes no locks. Two processes missing on the same key at the same
//! time both download it and both persist it; each write is an atomic rename,
//! so readers see one complete copy and the last writer wins.

pub mod error;
mod fetch;
mod key;

use crate::error::{ErrorKind, Result};
pub use crate::fetch::{DEFAULT_TIMEOUT, Fetch, HttpFetcher};
#[cfg(any(test, feature = "mock"))]
pub use crate::fetch::MockFetcher;
pub use crate::key::cache_key;
use exn::ResultExt;
use std::fs;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::instrument;

/// Name of the cache directory created inside the system temporary directory.
pub const DEFAULT_DIR_NAME: &str = "offmark-cache";

/// Returns the default, process-wide cache location: `<tmp>/offmark-cache`.
pub fn default_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DIR_NAME)
}

/// Filesystem-backed asset cache.
///
/// Constructed explicitly with the directory it owns and the fetcher it uses
/// on misses, then handed to whatever needs assets.
///
/// # Examples
///
/// ```no_run
/// use offmark_cache::{AssetCache, HttpFetcher, DEFAULT_TIMEOUT};
///
/// # fn example() -> offmark_cache::error::Result<()> {
/// let cache = AssetCache::new(offmark_cache::default_dir(), HttpFetcher::new(DEFAULT_TIMEOUT)?)?;
/// let js = cache.fetch_text("https://cdn.jsdelivr.net/npm/@highlightjs/cdn-assets@11.9.0/highlight.min.js")?;
/// # Ok(())
/// # }
/// ```
pub struct AssetCache {
    dir: PathBuf,
    fetcher: Box<dyn Fetch>,
}

impl AssetCache {
    /// Opens (and creates, if absent) the cache at `dir`.
    pub fn new(dir: impl Into<PathBuf>, fetcher: impl Fetch + 'static) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            fs::create_dir_all(&dir).or_raise(|| ErrorKind::Io(dir.clone()))?;
            tracing::debug!(dir = %dir.display(), "Created asset cache directory");
        }
        Ok(Self { dir, fetcher: Box::new(fetcher) })
    }

    /// The directory this cache reads from and writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the cache file for `url`, whether or not it exists yet.
    pub fn path_for(&self, url: &str) -> Result<PathBuf> {
        Ok(self.dir.join(cache_key(url)?))
    }

    /// Returns `true` if `url` would be served without a network request.
    pub fn contains(&self, url: &str) -> Result<bool> {
        Ok(self.path_for(url)?.is_file())
    }

    /// Returns the bytes for `url`, downloading and persisting them on a miss.
    #[instrument(skip(self), fields(hit))]
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.path_for(url)?;
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::Span::current().record("hit", true);
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "Asset served from cache");
                return Ok(bytes);
            },
            Err(e) if e.kind() != IoErrorKind::NotFound => return Err(e).or_raise(|| ErrorKind::Io(path)),
            Err(_) => {},
        }
        tracing::Span::current().record("hit", false);
        let bytes = self.fetcher.fetch(url)?;
        self.persist(&path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Asset cached");
        Ok(bytes)
    }

    /// Like [`fetch`](Self::fetch), but requires the asset to be UTF-8 text.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch(url)?;
        String::from_utf8(bytes).or_raise(|| ErrorKind::InvalidEncoding(url.to_string()))
    }

    /// Writes `bytes` to a sibling temporary file, then renames it over `path`.
    fn persist(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir).or_raise(|| ErrorKind::Io(self.dir.clone()))?;
        tmp.write_all(bytes).or_raise(|| ErrorKind::Io(tmp.path().to_path_buf()))?;
        tmp.persist(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        Ok(())
    }
}
