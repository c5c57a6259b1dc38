//! Conversion Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors raised by the component
//! crates are kept as children of these kinds.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A conversion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The Markdown source does not exist. Nothing was written.
    #[display("Markdown file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The Markdown source exists but could not be read as UTF-8 text.
    #[display("cannot read Markdown file: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The source already has an `.html` extension, so the output would
    /// overwrite it.
    #[display("output would overwrite the source file: {}", _0.display())]
    OutputIsSource(#[error(not(source))] PathBuf),
    /// The generated page could not be written.
    #[display("cannot write HTML file: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
    /// A stylesheet or script could not be downloaded or read from the cache.
    #[display("failed to obtain page assets")]
    Assets,
    /// The page could not be assembled.
    #[display("failed to render page")]
    Render,
    /// Local images could not be embedded.
    #[display("failed to embed images")]
    Images,
    /// Configuration could not be loaded.
    #[display("failed to load configuration")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Assets | Self::Write(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotFound(PathBuf::from("a.md")).to_string(), "Markdown file not found: a.md");
        assert_eq!(ErrorKind::Assets.to_string(), "failed to obtain page assets");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Assets.is_retryable());
        assert!(!ErrorKind::NotFound(PathBuf::new()).is_retryable());
        assert!(!ErrorKind::Render.is_retryable());
    }
}
