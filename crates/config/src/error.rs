//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An explicitly requested configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// A configuration source could not be parsed into settings.
    #[display("invalid configuration")]
    Invalid,
    /// Settings parsed, but a value is out of range.
    #[display("invalid value for '{field}': {reason}")]
    Validation { field: &'static str, reason: String },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        let kind = ErrorKind::Validation { field: "timeout", reason: "must be greater than zero".to_string() };
        assert_eq!(kind.to_string(), "invalid value for 'timeout': must be greater than zero");
        assert_eq!(ErrorKind::NotFound(PathBuf::from("/x.toml")).to_string(), "configuration file not found: /x.toml");
    }
}
