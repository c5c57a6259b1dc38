//! Asset Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An asset cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for asset cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The asset URL could not be parsed, or has no final path segment to
    /// use as a cache key.
    #[display("invalid asset URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The server answered with a non-success status.
    #[display("fetching {url} failed with HTTP status {status}")]
    Status { url: String, status: u16 },
    /// The HTTP client could not be set up (for example, no TLS backend).
    #[display("failed to build HTTP client")]
    Client,
    /// Timeout, DNS, TLS or connection failure before a status was received.
    #[display("fetching {_0} failed: network error")]
    Network(#[error(not(source))] String),
    /// The cache directory or one of its entries could not be read or written.
    #[display("cache I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// Asset content was requested as text but is not valid UTF-8.
    #[display("asset is not valid UTF-8: {_0}")]
    InvalidEncoding(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Network(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn error_kind_display() {
        let status = ErrorKind::Status { url: "https://example.com/a.css".to_string(), status: 404 };
        assert_eq!(status.to_string(), "fetching https://example.com/a.css failed with HTTP status 404");
        assert_eq!(ErrorKind::InvalidUrl("nope".to_string()).to_string(), "invalid asset URL: nope");
        assert_eq!(ErrorKind::Client.to_string(), "failed to build HTTP client");
    }

    #[rstest]
    #[case(ErrorKind::Status { url: String::new(), status: 404 }, false)]
    #[case(ErrorKind::Status { url: String::new(), status: 503 }, true)]
    #[case(ErrorKind::Status { url: String::new(), status: 429 }, true)]
    #[case(ErrorKind::Network(String::new()), true)]
    #[case(ErrorKind::InvalidUrl(String::new()), false)]
    #[case(ErrorKind::Io(PathBuf::from("/tmp")), false)]
    #[case(ErrorKind::Client, false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
