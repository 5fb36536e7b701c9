use regex::Regex;
use std::sync::LazyLock;

/// Base32 content hash, as used in ETags and version URIs.
const HASH: &str = "[a-z2-7]{59}";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Version identity.
regex!(ETAG_REGEX, format!(r#"^"({HASH})"$"#).as_str());
regex!(LINK_REGEX, r#"^<([:a-zA-Z0-9_\-\./#]+)>; rel="([a-z]+)"$"#);
regex!(VERSION_URI_REGEX, format!(r"^u:({HASH})#(.+)$").as_str());
pub(crate) const LINK_SEPARATOR: &str = ", ";

// Structural member patterns, tried in this order.
regex!(FILE_MEMBER_REGEX, format!(r"^dweb:/ipfs/{HASH}$").as_str());
regex!(MESSAGE_MEMBER_REGEX, format!(r"^u:{HASH}$").as_str());
regex!(PACKAGE_MEMBER_REGEX, format!(r"^u:{HASH}#_:c14n\d+$").as_str());

// RFC 3986, appendix B.
regex!(URI_REGEX, r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$");
regex!(SCHEME_REGEX, r"^[a-zA-Z][a-zA-Z0-9+\-.]*$");
regex!(PATH_SEGMENT_REGEX, r"^(?:[a-zA-Z0-9\-._~!$'()*+,;=:@%]|[A-F0-9]{2})+$");
