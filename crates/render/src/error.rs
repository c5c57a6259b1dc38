//! Render Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Asset was not loadable from the builtins embedded in the binary.
    #[display("builtin asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    /// A builtin asset is not valid UTF-8.
    #[display("builtin asset is not valid UTF-8: {_0}")]
    InvalidAsset(#[error(not(source))] String),
    /// The page template failed to compile or render.
    #[display("page template error")]
    Template,
    /// Markdown could not be rendered to HTML, or inline attributes could
    /// not be applied to the result.
    #[display("failed to render Markdown")]
    Markdown,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Everything rendered here is either embedded in the binary or passed
        // in by the caller; the same input fails the same way.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::AssetNotFound("builtin:nope.css".to_string()).to_string(), "builtin asset not found: builtin:nope.css");
        assert_eq!(ErrorKind::Template.to_string(), "page template error");
        assert!(!ErrorKind::Template.is_retryable());
        assert_eq!(ErrorKind::Markdown.to_string(), "failed to render Markdown");
    }
}
