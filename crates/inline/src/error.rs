//! Image Inlining Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! A referenced image that does not exist is *not* an error: it is logged,
//! recorded in the [`InlineReport`](crate::InlineReport) and left in place.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An image inlining error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for image inlining operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTML document could not be read or written back.
    #[display("cannot access document: {}", _0.display())]
    Document(#[error(not(source))] PathBuf),
    /// An image exists but could not be read.
    #[display("cannot read image: {}", _0.display())]
    Image(#[error(not(source))] PathBuf),
    /// The HTML rewriter rejected the document.
    #[display("failed to rewrite HTML")]
    Rewrite,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Document(_) | Self::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Image(PathBuf::from("/a/b.png")).to_string(), "cannot read image: /a/b.png");
        assert_eq!(ErrorKind::Rewrite.to_string(), "failed to rewrite HTML");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Document(PathBuf::new()).is_retryable());
        assert!(!ErrorKind::Rewrite.is_retryable());
    }
}
