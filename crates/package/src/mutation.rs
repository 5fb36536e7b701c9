//! Requests that change a package on the server.
//!
//! Only the request shape lives here; sending it, and encoding multipart file
//! uploads, is up to whatever HTTP client the caller uses. The responses are
//! handled by [`apply_mutation`](crate::apply_mutation).

use std::fmt::{Display, Formatter, Result as FmtResult};

use ldpkg_graph::{Quad, Term};

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::{Headers, VersionUri, child_path};
use crate::vocab::dcterms;

pub const N_QUADS: &str = "application/n-quads";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    /// WebDAV collection creation.
    Mkcol,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Mkcol => "MKCOL",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    pub method: Method,
    /// Package path relative to the server origin.
    pub path: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl MutationRequest {
    /// Fetch of the package at `path` as N-Quads.
    pub fn fetch(path: &str) -> Self {
        let mut headers = Headers::new();
        headers.append("Accept", N_QUADS);
        Self {
            method: Method::Get,
            path: path.to_string(),
            headers,
            body: None,
        }
    }

    /// Replaces the description of the package version `version`.
    ///
    /// The request is conditional on `version` still being current, and the
    /// single added statement is about the version's focus node.
    pub fn edit_description(path: &str, version: &VersionUri, description: &str) -> Self {
        let statement = Quad::new(
            Term::from_id(version.fragment()),
            Term::named(dcterms::DESCRIPTION),
            Term::literal(description),
        );
        let mut headers = Self::preconditions(version);
        headers.insert("Content-Type", N_QUADS);
        headers.append("Link", format!("<#{}>; rel=\"self\"", version.fragment()));
        Self {
            method: Method::Patch,
            path: path.to_string(),
            headers,
            body: Some(format!("{statement}\n")),
        }
    }

    /// Headers for a multipart upload of new files into `version`; the
    /// multipart body itself is left to the transport.
    pub fn upload_files(path: &str, version: &VersionUri) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            headers: Self::preconditions(version),
            body: None,
        }
    }

    /// Creates an empty package named `slug` inside `parent_path`.
    pub fn new_package(parent_path: &str, slug: &str) -> Result<Self> {
        if !consts::PATH_SEGMENT_REGEX.is_match(slug) {
            exn::bail!(ErrorKind::InvalidSlug(slug.to_string()));
        }
        Ok(Self {
            method: Method::Mkcol,
            path: child_path(parent_path, slug),
            headers: Headers::new(),
            body: None,
        })
    }

    /// The request target on the server at `origin`.
    pub fn url(&self, origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), self.path)
    }

    fn preconditions(version: &VersionUri) -> Headers {
        let mut headers = Headers::new();
        headers.append("If-Match", format!("\"{}\"", version.hash()));
        headers
    }
}

impl Display for MutationRequest {
    /// HTTP/1.1 message form, as it would go over the wire.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "{} {} HTTP/1.1", self.method, self.path)?;
        write!(f, "{}", self.headers)?;
        if let Some(body) = &self.body {
            write!(f, "\n{body}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldpkg_graph::parse_nquads;
    use rstest::rstest;

    fn version() -> VersionUri {
        "u:bafkreiujzdegxdncf32epf3dhodzdocis2jhtlgmxgedn73u55xtplpft7#_:c14n0".parse().unwrap()
    }

    #[test]
    fn test_edit_description() {
        let request = MutationRequest::edit_description("/example", &version(), "Say \"hi\"\nagain\\");
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.headers.get("content-type"), Some("application/n-quads"));
        assert_eq!(
            request.headers.get("if-match"),
            Some("\"bafkreiujzdegxdncf32epf3dhodzdocis2jhtlgmxgedn73u55xtplpft7\"")
        );
        assert_eq!(request.headers.get("link"), Some("<#_:c14n0>; rel=\"self\""));
        let body = request.body.as_deref().unwrap();
        assert_eq!(body, "_:c14n0 <http://purl.org/dc/terms/description> \"Say \\\"hi\\\"\\nagain\\\\\" .\n");

        // The body is itself a valid diff.
        let graph = parse_nquads(body).unwrap();
        let quad = graph.iter().next().unwrap();
        assert_eq!(quad.object.value(), "Say \"hi\"\nagain\\");
    }

    #[test]
    fn test_upload_files() {
        let request = MutationRequest::upload_files("/example", &version());
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.headers.len(), 1);
        assert!(request.headers.get("If-Match").is_some());
        assert_eq!(request.body, None);
    }

    #[rstest]
    #[case("/", "docs", "/docs")]
    #[case("/example", "2024-archive", "/example/2024-archive")]
    #[case("/example", "caf%C3%A9", "/example/caf%C3%A9")]
    fn test_new_package(#[case] parent: &str, #[case] slug: &str, #[case] path: &str) {
        let request = MutationRequest::new_package(parent, slug).unwrap();
        assert_eq!(request.method, Method::Mkcol);
        assert_eq!(request.path, path);
        assert_eq!(request.url("http://localhost:8086/"), format!("http://localhost:8086{path}"));
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    #[case("with space")]
    #[case("what?")]
    #[case("frag#ment")]
    fn test_new_package_invalid_slug(#[case] slug: &str) {
        let err = MutationRequest::new_package("/", slug).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidSlug(slug.to_string()));
    }

    #[test]
    fn test_display() {
        let request = MutationRequest::edit_description("/example", &version(), "x");
        let text = request.to_string();
        assert!(text.starts_with("PATCH /example HTTP/1.1\nIf-Match: "));
        assert!(text.ends_with("\n\n_:c14n0 <http://purl.org/dc/terms/description> \"x\" .\n"));
        assert_eq!(MutationRequest::fetch("/").to_string(), "GET / HTTP/1.1\nAccept: application/n-quads\n");
    }
}
