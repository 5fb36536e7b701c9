//! Vocabulary the package shape is written in.

use std::fmt::{Display, Formatter, Result as FmtResult};

pub mod dcterms {
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const SUBJECT: &str = "http://purl.org/dc/terms/subject";
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
    pub const EXTENT: &str = "http://purl.org/dc/terms/extent";
    pub const CREATED: &str = "http://purl.org/dc/terms/created";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
}

pub mod prov {
    pub const WAS_REVISION_OF: &str = "http://www.w3.org/ns/prov#wasRevisionOf";
    pub const HAD_MEMBER: &str = "http://www.w3.org/ns/prov#hadMember";
    pub const VALUE: &str = "http://www.w3.org/ns/prov#value";
}

pub mod ldp {
    pub const MEMBERSHIP_RESOURCE: &str = "http://www.w3.org/ns/ldp#membershipResource";
}

/// Every predicate the projector and patcher understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Title,
    Description,
    /// Keywords (`dcterms:subject`).
    Subject,
    Created,
    Modified,
    WasRevisionOf,
    HadMember,
    Value,
    MembershipResource,
    Format,
    Extent,
}

impl Predicate {
    pub const ALL: [Predicate; 11] = [
        Self::Title,
        Self::Description,
        Self::Subject,
        Self::Created,
        Self::Modified,
        Self::WasRevisionOf,
        Self::HadMember,
        Self::Value,
        Self::MembershipResource,
        Self::Format,
        Self::Extent,
    ];

    pub fn iri(&self) -> &'static str {
        match self {
            Self::Title => dcterms::TITLE,
            Self::Description => dcterms::DESCRIPTION,
            Self::Subject => dcterms::SUBJECT,
            Self::Created => dcterms::CREATED,
            Self::Modified => dcterms::MODIFIED,
            Self::WasRevisionOf => prov::WAS_REVISION_OF,
            Self::HadMember => prov::HAD_MEMBER,
            Self::Value => prov::VALUE,
            Self::MembershipResource => ldp::MEMBERSHIP_RESOURCE,
            Self::Format => dcterms::FORMAT,
            Self::Extent => dcterms::EXTENT,
        }
    }

    /// Exact IRI match; anything else is not a package predicate.
    pub fn from_iri(iri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|predicate| predicate.iri() == iri)
    }

    /// Short name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Subject => "keywords",
            Self::Created => "created",
            Self::Modified => "modified",
            Self::WasRevisionOf => "revision_of",
            Self::HadMember => "members",
            Self::Value => "value",
            Self::MembershipResource => "resource",
            Self::Format => "format",
            Self::Extent => "extent",
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
