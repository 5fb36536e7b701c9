use time::OffsetDateTime;

use super::{Member, ResourceType, Uri};

/// A versioned, directory-like collection of members.
///
/// Built once per successful projection and afterwards only ever mutated by
/// [`patch`](crate::patch), which never removes anything.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    /// The mutable resource this version belongs to.
    pub resource: Uri,
    /// Content address of the package's directory listing.
    pub value: Uri,
    /// Total size in bytes.
    pub extent: u64,
    pub name: String,
    pub description: Option<String>,
    /// `None` when the package never had keywords, which is not the same as
    /// an empty list.
    pub keywords: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub created: OffsetDateTime,
    /// Expected to be no earlier than `created`, but not checked.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub modified: OffsetDateTime,
    pub revision_of: Option<Uri>,
    /// Packages, then messages, then files, as projected; patched members are
    /// appended after those.
    pub members: Vec<Member>,
}

impl Package {
    pub fn members_of(&self, kind: ResourceType) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(move |member| member.resource_type() == kind)
    }

    pub fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }
}

/// Path of the entry `name` inside the package at `parent`.
///
/// ```
/// use ldpkg_package::models::child_path;
/// assert_eq!(child_path("/", "docs"), "/docs");
/// assert_eq!(child_path("/docs", "2024"), "/docs/2024");
/// ```
pub fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" { format!("/{name}") } else { format!("{parent}/{name}") }
}
