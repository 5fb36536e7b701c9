//! Validation Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A validation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The result document is not a ShEx validation result.
    #[display("invalid validation result document")]
    InvalidResult,
    /// The result does not describe the requested focus node.
    #[display("no shape test for focus node: {_0}")]
    UnknownFocus(#[error(not(source))] String),
    /// The validator itself could not run (schema or engine problem).
    #[display("validator error: {_0}")]
    Validator(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
