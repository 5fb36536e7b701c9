//! In-memory RDF graph store.
//!
//! Packages arrive from the server as N-Quads; this crate turns that text into
//! a queryable, insertion-ordered [`Graph`] and back again.

pub mod error;
mod nquads;
mod store;
mod term;

pub use crate::nquads::parse_nquads;
pub use crate::store::{Graph, Pattern};
pub use crate::term::{Literal, Quad, RDF_LANG_STRING, Term, XSD_STRING};
