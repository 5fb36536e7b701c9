//! Versioned Linked-Data packages.
//!
//! A package is served as an RDF graph, pinned to an immutable version by its
//! response headers. This crate:
//!
//! - resolves that version from `ETag`/`Link` headers ([`resolve_version`]),
//! - projects a shape-validation result into a typed [`Package`](models::Package)
//!   ([`project`]),
//! - applies the diff returned by a mutation onto an already-loaded package
//!   ([`patch`]), and
//! - builds the mutation requests themselves ([`MutationRequest`]).
//!
//! ```
//! use ldpkg_package::models::Headers;
//! use ldpkg_package::resolve_version;
//!
//! let headers: Headers = [
//!     ("ETag", "\"bafkreiujzdegxdncf32epf3dhodzdocis2jhtlgmxgedn73u55xtplpft7\""),
//!     ("Link", "<#_:c14n0>; rel=\"self\""),
//! ]
//! .into_iter()
//! .collect();
//! let version = resolve_version(&headers).unwrap();
//! assert_eq!(version.fragment(), "_:c14n0");
//! ```

mod consts;
pub mod error;
mod literal;
mod load;
pub mod models;
mod mutation;
mod patch;
mod project;
mod resolve;
pub mod vocab;

pub use crate::load::{LoadedPackage, MutationOutcome, Response, apply_mutation, load_package};
pub use crate::mutation::{Method, MutationRequest, N_QUADS};
pub use crate::patch::{PatchOutcome, patch};
pub use crate::project::project;
pub use crate::resolve::{LinkRelations, parse_link_header, resolve_version, try_resolve_version};
