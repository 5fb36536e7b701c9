use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use exn::OptionExt;

use super::Uri;
use crate::consts;
use crate::error::{Error, ErrorKind, Result};

/// Scheme reserved for content-addressed package versions.
pub const VERSION_SCHEME: &str = "u";

/// Immutable identity of one version of a package: the content hash the
/// server reported, plus the focus node inside that version's graph.
///
/// Serialized as `u:<hash>#<fragment>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionUri {
    hash: String,
    fragment: String,
}

impl VersionUri {
    pub(crate) fn new(hash: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            fragment: fragment.into(),
        }
    }

    /// The 59-character content hash; also the `If-Match` token for edits.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The focus node, e.g. `_:c14n0`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn to_uri(&self) -> Uri {
        Uri {
            scheme: Some(VERSION_SCHEME.to_string()),
            path: self.hash.clone(),
            fragment: Some(self.fragment.clone()),
            ..Uri::default()
        }
    }
}

impl Display for VersionUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{VERSION_SCHEME}:{}#{}", self.hash, self.fragment)
    }
}

impl FromStr for VersionUri {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let captures = consts::VERSION_URI_REGEX
            .captures(s)
            .ok_or_raise(|| ErrorKind::InvalidUri(s.to_string()))?;
        Ok(Self::new(&captures[1], &captures[2]))
    }
}

impl From<VersionUri> for Uri {
    fn from(version: VersionUri) -> Self {
        version.to_uri()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VersionUri {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VersionUri {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(|err: Error| serde::de::Error::custom(&*err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HASH: &str = "bafkreiujzdegxdncf32epf3dhodzdocis2jhtlgmxgedn73u55xtplpft7";

    #[test]
    fn test_display_and_parse() {
        let version = VersionUri::new(HASH, "_:c14n0");
        let text = version.to_string();
        assert_eq!(text, format!("u:{HASH}#_:c14n0"));
        assert_eq!(text.parse::<VersionUri>().unwrap(), version);
        assert_eq!(version.to_uri().to_string(), text);
    }

    #[rstest]
    #[case(format!("u:{HASH}"))]
    #[case(format!("x:{HASH}#_:c14n0"))]
    #[case(format!("u:{}#_:c14n0", &HASH[1..]))]
    #[case(format!("u:{}#_:c14n0", HASH.replace('a', "1")))]
    fn test_parse_invalid(#[case] text: String) {
        assert!(text.parse::<VersionUri>().is_err());
    }
}
