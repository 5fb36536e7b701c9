use std::fmt::{Display, Formatter, Result as FmtResult};

use exn::OptionExt;

use super::Uri;
use crate::consts;
use crate::error::{ErrorKind, Result};

/// What kind of resource a package member points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceType {
    /// A nested package (`ldp:DirectContainer`).
    Package,
    /// An RDF dataset (`ldp:RDFSource`).
    Message,
    /// An opaque file (`ldp:NonRDFSource`).
    File,
}

impl ResourceType {
    /// Order in which member groups are projected.
    pub const ALL: [ResourceType; 3] = [Self::Package, Self::Message, Self::File];

    /// Classifies a member IRI by its shape alone.
    ///
    /// ```
    /// use ldpkg_package::models::ResourceType;
    /// let hash = "bafkreiujzdegxdncf32epf3dhodzdocis2jhtlgmxgedn73u55xtplpft7";
    /// assert_eq!(ResourceType::classify(&format!("dweb:/ipfs/{hash}")), Some(ResourceType::File));
    /// assert_eq!(ResourceType::classify(&format!("u:{hash}")), Some(ResourceType::Message));
    /// assert_eq!(ResourceType::classify(&format!("u:{hash}#_:c14n2")), Some(ResourceType::Package));
    /// assert_eq!(ResourceType::classify("http://example.com/"), None);
    /// ```
    pub fn classify(iri: &str) -> Option<Self> {
        if consts::FILE_MEMBER_REGEX.is_match(iri) {
            Some(Self::File)
        } else if consts::MESSAGE_MEMBER_REGEX.is_match(iri) {
            Some(Self::Message)
        } else if consts::PACKAGE_MEMBER_REGEX.is_match(iri) {
            Some(Self::Package)
        } else {
            None
        }
    }

    /// Label of the shape members of this type are validated against.
    pub fn shape_label(&self) -> &'static str {
        match self {
            Self::Package => "_:p",
            Self::Message => "_:m",
            Self::File => "_:f",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Message => "message",
            Self::File => "file",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageMember {
    pub value: Uri,
    pub resource: Uri,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageMember {
    pub value: Uri,
    pub resource: Option<Uri>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileMember {
    pub value: Uri,
    /// MIME type.
    pub format: String,
    /// Size in bytes.
    pub extent: u64,
    pub resource: Option<Uri>,
    pub title: Option<String>,
}

/// One entry of a package.
///
/// Only messages and files may lack a resource and title; a nested package
/// always has both.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(tag = "type", rename_all = "lowercase"))]
pub enum Member {
    Package(PackageMember),
    Message(MessageMember),
    File(FileMember),
}

impl Member {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Package(_) => ResourceType::Package,
            Self::Message(_) => ResourceType::Message,
            Self::File(_) => ResourceType::File,
        }
    }

    /// URI of the underlying content.
    pub fn value(&self) -> &Uri {
        match self {
            Self::Package(member) => &member.value,
            Self::Message(member) => &member.value,
            Self::File(member) => &member.value,
        }
    }

    pub fn resource(&self) -> Option<&Uri> {
        match self {
            Self::Package(member) => Some(&member.resource),
            Self::Message(member) => member.resource.as_ref(),
            Self::File(member) => member.resource.as_ref(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Package(member) => Some(&member.title),
            Self::Message(member) => member.title.as_deref(),
            Self::File(member) => member.title.as_deref(),
        }
    }

    /// The title, falling back to the value's path.
    pub fn display_name(&self) -> &str {
        self.title().unwrap_or(self.value().path.as_str())
    }
}

/// Accumulates a member's fields before its required fields are known to be
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBuilder {
    kind: ResourceType,
    value: Uri,
    resource: Option<Uri>,
    title: Option<String>,
    format: Option<String>,
    extent: Option<u64>,
}

impl MemberBuilder {
    pub fn new(kind: ResourceType, value: Uri) -> Self {
        Self {
            kind,
            value,
            resource: None,
            title: None,
            format: None,
            extent: None,
        }
    }

    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    pub fn resource(mut self, resource: Uri) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Ignored unless the member is a file.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        if self.kind == ResourceType::File {
            self.format = Some(format.into());
        }
        self
    }

    /// Ignored unless the member is a file.
    pub fn extent(mut self, extent: u64) -> Self {
        if self.kind == ResourceType::File {
            self.extent = Some(extent);
        }
        self
    }

    /// Converts into a [`Member`], failing with
    /// [`IncompleteMember`](ErrorKind::IncompleteMember) if the resource type
    /// requires a field that was never set.
    pub fn build(self) -> Result<Member> {
        let member = self.value.to_string();
        let missing = |field: &'static str| ErrorKind::IncompleteMember {
            member: member.clone(),
            field,
        };
        Ok(match self.kind {
            ResourceType::Package => Member::Package(PackageMember {
                resource: self.resource.ok_or_raise(|| missing("resource"))?,
                title: self.title.ok_or_raise(|| missing("title"))?,
                value: self.value,
            }),
            ResourceType::Message => Member::Message(MessageMember {
                value: self.value,
                resource: self.resource,
                title: self.title,
            }),
            ResourceType::File => Member::File(FileMember {
                format: self.format.ok_or_raise(|| missing("format"))?,
                extent: self.extent.ok_or_raise(|| missing("extent"))?,
                value: self.value,
                resource: self.resource,
                title: self.title,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HASH: &str = "bafkreiv4seh2kvj72ceuvw75efr6edt4sywb5wkh7dnsipzz7fk4zri3r2";

    fn uri(text: &str) -> Uri {
        Uri::parse(text).unwrap()
    }

    #[rstest]
    #[case(format!("dweb:/ipfs/{HASH}"), Some(ResourceType::File))]
    #[case(format!("u:{HASH}"), Some(ResourceType::Message))]
    #[case(format!("u:{HASH}#_:c14n12"), Some(ResourceType::Package))]
    #[case(format!("u:{HASH}#_:b0"), None)]
    #[case(format!("u:{HASH}#_:c14n"), None)]
    #[case(format!("dweb:/ipfs/{HASH}/x"), None)]
    #[case(format!("u:{}", HASH.to_uppercase()), None)]
    #[case(format!("u:{HASH}a"), None)]
    fn test_classify(#[case] iri: String, #[case] expected: Option<ResourceType>) {
        assert_eq!(ResourceType::classify(&iri), expected);
    }

    #[test]
    fn test_build_package_requires_resource_and_title() {
        let value = uri(&format!("u:{HASH}#_:c14n1"));
        let err = MemberBuilder::new(ResourceType::Package, value.clone()).title("docs").build().unwrap_err();
        assert!(matches!(&*err, ErrorKind::IncompleteMember { field: "resource", .. }));

        let member = MemberBuilder::new(ResourceType::Package, value)
            .resource(uri("http://localhost:8086/docs"))
            .title("docs")
            .build()
            .unwrap();
        assert_eq!(member.resource_type(), ResourceType::Package);
        assert_eq!(member.title(), Some("docs"));
        assert_eq!(member.display_name(), "docs");
    }

    #[test]
    fn test_build_message_without_optional_fields() {
        let member = MemberBuilder::new(ResourceType::Message, uri(&format!("u:{HASH}"))).build().unwrap();
        assert_eq!(member.resource(), None);
        assert_eq!(member.display_name(), HASH);
    }

    #[test]
    fn test_build_file() {
        let value = uri(&format!("dweb:/ipfs/{HASH}"));
        let err = MemberBuilder::new(ResourceType::File, value.clone()).format("text/plain").build().unwrap_err();
        assert!(matches!(&*err, ErrorKind::IncompleteMember { field: "extent", .. }));

        let member = MemberBuilder::new(ResourceType::File, value).format("text/plain").extent(12).build().unwrap();
        let Member::File(file) = &member else {
            panic!("expected a file member");
        };
        assert_eq!(file.extent, 12);
        assert_eq!(member.display_name(), format!("/ipfs/{HASH}"));
    }

    #[test]
    fn test_file_fields_ignored_for_other_types() {
        let member = MemberBuilder::new(ResourceType::Message, uri(&format!("u:{HASH}")))
            .format("text/plain")
            .extent(3)
            .title("log")
            .build()
            .unwrap();
        assert_eq!(
            member,
            Member::Message(MessageMember {
                value: uri(&format!("u:{HASH}")),
                resource: None,
                title: Some("log".to_string()),
            })
        );
    }
}
