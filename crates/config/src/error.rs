//! Configuration Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration sources could not be read or merged.
    #[display("invalid configuration: {_0}")]
    InvalidConfig(#[error(not(source))] String),
    /// A configured origin is not an absolute `scheme://host` URI.
    #[display("invalid {field} origin: {value}")]
    InvalidOrigin { field: &'static str, value: String },
}

impl ErrorKind {
    /// Nothing in configuration gets better by trying again.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
