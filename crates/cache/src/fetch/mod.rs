//! Asset retrieval.
//!
//! The cache itself never talks to the network; it asks a [`Fetch`]
//! implementation for the bytes behind a URL on a cache miss. Production code
//! uses [`HttpFetcher`]; tests inject the in-memory [`MockFetcher`].

mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::http::{DEFAULT_TIMEOUT, HttpFetcher};
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockFetcher;
use crate::error::Result;

/// Retrieves the full body behind an asset URL.
pub trait Fetch: Send + Sync {
    /// Performs exactly one request for `url` and returns the response body.
    ///
    /// Implementations must fail (rather than return an error page) when the
    /// server does not answer with a success status.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url)
    }
}
