//! Lexical forms of the literals a package graph carries.

use exn::ResultExt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::{ErrorKind, Result};
use crate::models::Uri;

/// Parses an `xsd:dateTime`. Values without an offset are taken as UTC.
pub(crate) fn timestamp(field: &'static str, value: &str) -> Result<OffsetDateTime> {
    if let Ok(timestamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(timestamp);
    }
    let local = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    PrimitiveDateTime::parse(value, local)
        .map(PrimitiveDateTime::assume_utc)
        .or_raise(|| ErrorKind::ParseError {
            field,
            value: value.to_string(),
        })
}

/// Parses a non-negative `xsd:integer` byte count.
pub(crate) fn extent(value: &str) -> Result<u64> {
    value.trim().parse::<u64>().or_raise(|| ErrorKind::ParseError {
        field: "extent",
        value: value.to_string(),
    })
}

pub(crate) fn uri(value: &str) -> Result<Uri> {
    Uri::parse(value)
}
