use super::Fetch;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::instrument;

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP(S) fetcher with a bounded per-request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status { url: url.to_string(), status: status.as_u16() });
        }
        let body = response.bytes().or_raise(|| ErrorKind::Network(url.to_string()))?;
        tracing::debug!(bytes = body.len(), status = status.as_u16(), "Asset downloaded");
        Ok(body.to_vec())
    }
}
