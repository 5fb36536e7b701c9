mod headers;
mod member;
mod package;
mod uri;
mod version;

pub use self::headers::{Headers, parse_status_line};
pub use self::member::{FileMember, Member, MemberBuilder, MessageMember, PackageMember, ResourceType};
pub use self::package::{Package, child_path};
pub use self::uri::Uri;
pub use self::version::{VERSION_SCHEME, VersionUri};
