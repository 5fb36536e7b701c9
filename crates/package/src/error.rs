//! Package Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. The `Display` of any error is what a
//! view shows under "could not load package".

use derive_more::{Display, Error};

/// A package error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for package operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// `ETag`/`Link` are absent or do not follow the expected grammar; there
    /// is no version available for this response.
    #[display("no version available: {_0}")]
    MalformedHeader(#[error(not(source))] &'static str),
    /// A predicate the package shape requires has zero or several solutions.
    #[display("malformed package graph: {_0}")]
    MalformedPackageGraph(#[error(not(source))] &'static str),
    /// A member IRI matched none of the known resource patterns.
    #[display("unclassifiable member: {_0}")]
    UnclassifiableMember(#[error(not(source))] String),
    /// The validator reported that the focus node does not conform.
    #[display("package {_0} does not conform to the package shape")]
    ValidationFailed(#[error(not(source))] String),
    /// A member was missing a field its resource type requires.
    #[display("member {member} is missing {field}")]
    IncompleteMember {
        /// The member's value IRI.
        member: String,
        field: &'static str,
    },
    /// A literal was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending lexical value.
        value: String,
    },
    #[display("invalid URI: {_0}")]
    InvalidUri(#[error(not(source))] String),
    /// The response body is not a readable graph.
    #[display("unreadable package graph")]
    Graph,
    /// The validator could not run.
    #[display("validator failure")]
    Validator,
    #[display("unexpected response status {_0}")]
    UnexpectedStatus(#[error(not(source))] u16),
    /// A new package name is not a single URI path segment.
    #[display("invalid package name: {_0:?}")]
    InvalidSlug(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The server may recover; everything else is a property of data
        // that has already been received.
        matches!(self, Self::UnexpectedStatus(status) if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::MalformedHeader("missing ETag"), "no version available: missing ETag")]
    #[case(ErrorKind::MalformedPackageGraph("title"), "malformed package graph: title")]
    #[case(ErrorKind::IncompleteMember { member: "u:x".to_string(), field: "title" }, "member u:x is missing title")]
    #[case(ErrorKind::InvalidSlug("a/b".to_string()), "invalid package name: \"a/b\"")]
    fn test_display(#[case] kind: ErrorKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[rstest]
    #[case(ErrorKind::UnexpectedStatus(503), true)]
    #[case(ErrorKind::UnexpectedStatus(412), false)]
    #[case(ErrorKind::Graph, false)]
    #[case(ErrorKind::MalformedHeader("missing Link"), false)]
    fn test_is_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
