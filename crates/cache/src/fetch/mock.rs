//! In-memory fetcher for testing.

use super::Fetch;
use crate::error::{ErrorKind, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves canned responses and counts every request it receives.
///
/// URLs without a canned response answer like a server returning `404`.
#[derive(Default)]
pub struct MockFetcher {
    assets: HashMap<String, Vec<u8>>,
    requests: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn with_assets(assets: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        Self {
            assets: assets.into_iter().map(|(url, body)| (url.into(), body.into())).collect(),
            ..Self::default()
        }
    }

    /// Total number of requests made, successful or not.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of requests made for one URL.
    pub fn requests_for(&self, url: &str) -> usize {
        self.log.lock().map(|log| log.iter().filter(|u| *u == url).count()).unwrap_or_default()
    }
}

impl Fetch for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.log.lock() {
            log.push(url.to_string());
        }
        match self.assets.get(url) {
            Some(body) => Ok(body.clone()),
            None => exn::bail!(ErrorKind::Status { url: url.to_string(), status: 404 }),
        }
    }
}
