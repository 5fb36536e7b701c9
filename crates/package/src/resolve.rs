//! Version identity from response metadata.
//!
//! Every package response carries a content-hash `ETag` and a `Link` header
//! whose `self` relation names the focus node. Together they pin the response
//! to an immutable [`VersionUri`].

use std::collections::HashMap;

use exn::OptionExt;
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::{Headers, Uri, VersionUri};

/// Link targets grouped by relation, each group in header order.
pub type LinkRelations = HashMap<String, Vec<Uri>>;

/// Parses a `Link` header of the form `<uri>; rel="token", <uri>; rel="token"`.
///
/// Entries are split on the exact separator `", "`. Entries that do not match
/// the grammar, or whose target is not a URI, are dropped.
///
/// ```
/// use ldpkg_package::parse_link_header;
/// let links = parse_link_header(r#"<#_:c14n0>; rel="self", <http://a/b>; rel="up""#);
/// assert_eq!(links["self"][0].fragment.as_deref(), Some("_:c14n0"));
/// assert_eq!(links["up"][0].path, "/b");
/// ```
pub fn parse_link_header(header: &str) -> LinkRelations {
    let mut relations = LinkRelations::new();
    for entry in header.split(consts::LINK_SEPARATOR) {
        let Some(captures) = consts::LINK_REGEX.captures(entry) else {
            tracing::trace!(entry, "skipping malformed link");
            continue;
        };
        let Ok(target) = Uri::parse(&captures[1]) else {
            tracing::trace!(entry, "skipping link with invalid target");
            continue;
        };
        relations.entry(captures[2].to_string()).or_default().push(target);
    }
    relations
}

/// Derives the version URI of a response, explaining why when there is none.
#[instrument(level = "debug", skip(headers), fields(version))]
pub fn try_resolve_version(headers: &Headers) -> Result<VersionUri> {
    let etag = headers.get("ETag").ok_or_raise(|| ErrorKind::MalformedHeader("missing ETag header"))?;
    let hash = consts::ETAG_REGEX
        .captures(etag)
        .and_then(|captures| captures.get(1))
        .ok_or_raise(|| ErrorKind::MalformedHeader("ETag is not a quoted content hash"))?;
    let link = headers
        .get_joined("Link")
        .ok_or_raise(|| ErrorKind::MalformedHeader("missing Link header"))?;
    let relations = parse_link_header(&link);
    let target = match relations.get("self").map(Vec::as_slice) {
        Some([target]) => target,
        Some([]) | None => exn::bail!(ErrorKind::MalformedHeader("no self link")),
        Some(_) => exn::bail!(ErrorKind::MalformedHeader("more than one self link")),
    };
    let fragment = target
        .fragment
        .as_deref()
        .filter(|fragment| !fragment.is_empty())
        .ok_or_raise(|| ErrorKind::MalformedHeader("self link does not name a focus node"))?;
    let version = VersionUri::new(hash.as_str(), fragment);
    tracing::Span::current().record("version", tracing::field::display(&version));
    Ok(version)
}

/// Derives the version URI of a response, or `None` if its `ETag`/`Link`
/// headers are absent or malformed.
pub fn resolve_version(headers: &Headers) -> Option<VersionUri> {
    try_resolve_version(headers).ok()
}
