//! Fetch-and-project and mutate-and-patch flows over received responses.

use exn::ResultExt;
use ldpkg_graph::parse_nquads;
use ldpkg_shex::Validator;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::{Headers, Package, VersionUri};
use crate::patch::{PatchOutcome, patch};
use crate::project::project;
use crate::resolve::try_resolve_version;

/// An HTTP response, already received in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, headers: Headers, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

/// A projected package together with the version it was projected from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPackage {
    pub version: VersionUri,
    pub package: Package,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// `204 No Content`: nothing beyond metadata changed.
    Unchanged,
    /// `200 OK` with a diff that has been applied.
    Patched { version: VersionUri, outcome: PatchOutcome },
}

/// Resolves the version of a package response, validates its graph at the
/// version's focus node, and projects the result.
#[instrument(skip(response, validator), fields(status = response.status, body_size = response.body.len(), version))]
pub fn load_package(response: &Response, validator: &impl Validator) -> Result<LoadedPackage> {
    if !(200..300).contains(&response.status) {
        exn::bail!(ErrorKind::UnexpectedStatus(response.status));
    }
    let version = try_resolve_version(&response.headers)?;
    tracing::Span::current().record("version", tracing::field::display(&version));
    let graph = parse_nquads(&response.body).or_raise(|| ErrorKind::Graph)?;
    let result = validator.validate(&graph, version.fragment()).or_raise(|| ErrorKind::Validator)?;
    let package = project(&result, version.fragment())?;
    tracing::info!(name = %package.name, members = package.members.len(), "loaded package");
    Ok(LoadedPackage { version, package })
}

/// Applies the response to a mutation onto `package`.
///
/// On success the caller should replace its version with the one returned,
/// since further edits must be made against it.
#[instrument(skip(package, response), fields(status = response.status, body_size = response.body.len()))]
pub fn apply_mutation(package: &mut Package, response: &Response) -> Result<MutationOutcome> {
    match response.status {
        204 => {
            tracing::debug!("mutation left package content unchanged");
            Ok(MutationOutcome::Unchanged)
        },
        200 => {
            let version = try_resolve_version(&response.headers)?;
            let diff = parse_nquads(&response.body).or_raise(|| ErrorKind::Graph)?;
            let outcome = patch(package, &diff, version.fragment());
            Ok(MutationOutcome::Patched { version, outcome })
        },
        status => exn::bail!(ErrorKind::UnexpectedStatus(status)),
    }
}
